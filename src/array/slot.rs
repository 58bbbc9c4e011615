//! Element types that can live in a slot region.

use bytes::{Buf, BufMut};
use std::fmt::{Debug, Display};

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// A fixed-width numeric value stored in one slot.
///
/// Implemented for `i64` (timestamps, counters) and `f64` (gauges). Ordering
/// is the natural `PartialOrd` of the type; NaN and signed zero get no
/// special treatment.
pub trait Slot:
    sealed::Sealed + Copy + PartialOrd + PartialEq + Debug + Display + Send + Sync + 'static
{
    /// Width of one slot in bytes
    const WIDTH: usize;

    /// Value of a zero-filled slot
    const ZERO: Self;

    /// Append the little-endian encoding of `self`
    fn put_le<B: BufMut>(self, buf: &mut B);

    /// Consume one little-endian value from `buf`
    fn get_le<B: Buf>(buf: &mut B) -> Self;

    /// Addition used by window sums; integers wrap on overflow
    fn accumulate(self, other: Self) -> Self;

    /// Numeric conversion to `f64`
    fn to_f64(self) -> f64;

    /// Numeric conversion from `f64`, truncating toward zero for integers
    fn from_f64(value: f64) -> Self;
}

impl Slot for i64 {
    const WIDTH: usize = 8;
    const ZERO: Self = 0;

    #[inline]
    fn put_le<B: BufMut>(self, buf: &mut B) {
        buf.put_i64_le(self);
    }

    #[inline]
    fn get_le<B: Buf>(buf: &mut B) -> Self {
        buf.get_i64_le()
    }

    #[inline]
    fn accumulate(self, other: Self) -> Self {
        self.wrapping_add(other)
    }

    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_f64(value: f64) -> Self {
        value as i64
    }
}

impl Slot for f64 {
    const WIDTH: usize = 8;
    const ZERO: Self = 0.0;

    #[inline]
    fn put_le<B: BufMut>(self, buf: &mut B) {
        buf.put_f64_le(self);
    }

    #[inline]
    fn get_le<B: Buf>(buf: &mut B) -> Self {
        buf.get_f64_le()
    }

    #[inline]
    fn accumulate(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}
