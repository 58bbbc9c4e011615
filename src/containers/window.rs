//! Fixed-capacity sliding window of recent samples.

use crate::array::{NumericArray, Slot};
use crate::core::{ArrayConfig, ArrayError, Result};
use bytes::Bytes;
use std::fmt;

/// Window of `i64` samples
pub type LongSlidingWindow = SlidingWindow<i64>;

/// Window of `f64` samples
pub type DoubleSlidingWindow = SlidingWindow<f64>;

/// A window holding the most recent `capacity` samples, newest first.
///
/// Index 0 is always the latest insert. Once the window is full every insert
/// evicts the value at the highest index. Capacity never changes, including
/// across [`SlidingWindow::clear`].
pub struct SlidingWindow<T: Slot> {
    array: NumericArray<T>,
}

impl<T: Slot> SlidingWindow<T> {
    /// Create an empty window of `capacity` samples.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(SlidingWindow {
            array: NumericArray::new(ArrayConfig::sliding_window(capacity))?,
        })
    }

    /// Create a window and insert `values` in order, so the last value ends
    /// up newest.
    pub fn from_values(capacity: usize, values: &[T]) -> Result<Self> {
        let mut window = Self::new(capacity)?;
        window.insert_all(values)?;
        Ok(window)
    }

    /// Create a window from the output of [`SlidingWindow::to_bytes`].
    pub fn from_bytes(capacity: usize, bytes: &[u8]) -> Result<Self> {
        let mut window = Self::new(capacity)?;
        window.load_bytes(bytes)?;
        Ok(window)
    }

    /// Insert `value` as the newest sample, returning the evicted oldest
    /// sample if the window was full.
    pub fn insert(&mut self, value: T) -> Result<Option<T>> {
        self.array.roll_right_cap(0, value)
    }

    /// Insert each value in turn.
    pub fn insert_all(&mut self, values: &[T]) -> Result<()> {
        for value in values {
            self.insert(*value)?;
        }
        Ok(())
    }

    /// Sample at `index`, 0 being the newest.
    pub fn get(&self, index: usize) -> Result<T> {
        self.array.get(index)
    }

    /// Most recent sample
    pub fn newest(&self) -> Result<Option<T>> {
        if self.is_empty() {
            self.array.raw().ensure_live()?;
            return Ok(None);
        }
        self.array.get(0).map(Some)
    }

    /// Number of samples held
    pub fn size(&self) -> usize {
        self.array.size()
    }

    /// Number of samples the window retains
    pub fn capacity(&self) -> usize {
        self.array.max_capacity()
    }

    /// Returns true if no sample is held
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Returns true once the window holds `capacity` samples
    pub fn is_full(&self) -> bool {
        self.size() == self.capacity()
    }

    /// Sum of every sample. Integer sums wrap.
    pub fn sum(&self) -> Result<T> {
        self.sum_within(self.size())
    }

    /// Sum of the newest `within` samples.
    pub fn sum_within(&self, within: usize) -> Result<T> {
        self.array.sum_first(within)
    }

    /// Mean of every sample.
    pub fn avg(&self) -> Result<T> {
        self.avg_within(self.size())
    }

    /// Mean of the newest `within` samples, truncated toward zero for
    /// integers. Zero when the window is empty.
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_within(&self, within: usize) -> Result<T> {
        let samples = self.array.to_f64_vec()?;
        let count = within.min(samples.len());
        let total: f64 = samples[..count].iter().sum();
        if count == 0 || total == 0.0 {
            return Ok(T::ZERO);
        }
        Ok(T::from_f64(total / count as f64))
    }

    /// Smallest sample
    pub fn min(&self) -> Result<Option<T>> {
        self.array.min()
    }

    /// Largest sample
    pub fn max(&self) -> Result<Option<T>> {
        self.array.max()
    }

    /// Add `delta` to the sample at `index` and return the new value.
    pub fn inc(&mut self, index: usize, delta: T) -> Result<T> {
        self.array.increment(index, delta)
    }

    /// Add `delta` to the newest sample.
    pub fn inc_newest(&mut self, delta: T) -> Result<T> {
        self.inc(0, delta)
    }

    /// Overwrite the newest sample.
    pub fn set_newest(&mut self, value: T) -> Result<()> {
        self.array.set(0, value)
    }

    /// Index of the newest sample equal to `value`.
    pub fn find(&self, value: T) -> Result<Option<usize>> {
        self.array.position(value)
    }

    /// Samples, newest first
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.array.to_vec()
    }

    /// Samples converted to `f64`, newest first
    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        self.array.to_f64_vec()
    }

    /// Little-endian concatenation of the samples, newest first.
    pub fn to_bytes(&self) -> Result<Bytes> {
        self.array.to_bytes()
    }

    /// Replace the samples with those in `bytes`, keeping the capacity.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let slots = bytes.len() / T::WIDTH;
        if slots > self.capacity() {
            return Err(ArrayError::overflow(slots, self.capacity()));
        }
        self.array.load_bytes(bytes)
    }

    /// Drop every sample.
    pub fn clear(&mut self) -> Result<()> {
        self.array.clear()
    }

    /// Copy into a new window with its own region.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(SlidingWindow {
            array: self.array.try_clone()?,
        })
    }

    /// Release the slot region. Idempotent.
    pub fn destroy(&mut self) {
        self.array.destroy();
    }

    /// Returns true until the window is destroyed
    pub fn is_live(&self) -> bool {
        self.array.is_live()
    }
}

impl<T: Slot> fmt::Display for SlidingWindow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.array, f)
    }
}

impl<T: Slot> fmt::Debug for SlidingWindow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlidingWindow")
            .field("capacity", &self.capacity())
            .field("samples", &self.array.to_vec().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_newest_first_with_eviction() {
        let mut window = LongSlidingWindow::new(3).unwrap();
        assert_eq!(window.insert(1).unwrap(), None);
        assert_eq!(window.insert(2).unwrap(), None);
        assert_eq!(window.insert(3).unwrap(), None);
        assert!(window.is_full());
        assert_eq!(window.insert(4).unwrap(), Some(1));

        assert_eq!(window.to_vec().unwrap(), vec![4, 3, 2]);
        assert_eq!(window.sum().unwrap(), 9);
        assert_eq!(window.avg().unwrap(), 3);
        assert_eq!(window.capacity(), 3);
    }

    #[test]
    fn test_partial_statistics() {
        let window = LongSlidingWindow::from_values(5, &[10, 20, 30]).unwrap();
        assert_eq!(window.size(), 3);
        assert_eq!(window.sum_within(2).unwrap(), 50);
        assert_eq!(window.avg_within(2).unwrap(), 25);
        assert_eq!(window.sum_within(10).unwrap(), 60);
        assert_eq!(window.avg_within(0).unwrap(), 0);
    }

    #[test]
    fn test_integer_average_truncates() {
        let window = LongSlidingWindow::from_values(4, &[1, 2]).unwrap();
        assert_eq!(window.avg().unwrap(), 1);
        let floats = DoubleSlidingWindow::from_values(4, &[1.0, 2.0]).unwrap();
        assert_eq!(floats.avg().unwrap(), 1.5);
    }

    #[test]
    fn test_empty_window_statistics() {
        let window = LongSlidingWindow::new(4).unwrap();
        assert_eq!(window.sum().unwrap(), 0);
        assert_eq!(window.avg().unwrap(), 0);
        assert_eq!(window.min().unwrap(), None);
        assert_eq!(window.newest().unwrap(), None);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut window = LongSlidingWindow::from_values(3, &[1, 2, 3, 4]).unwrap();
        window.clear().unwrap();
        assert!(window.is_empty());
        assert_eq!(window.capacity(), 3);
        window.insert_all(&[7, 8, 9, 10]).unwrap();
        assert_eq!(window.to_vec().unwrap(), vec![10, 9, 8]);
    }

    #[test]
    fn test_increment_and_set_newest() {
        let mut window = LongSlidingWindow::from_values(3, &[1, 2]).unwrap();
        assert_eq!(window.inc_newest(5).unwrap(), 7);
        assert_eq!(window.inc(1, 1).unwrap(), 2);
        window.set_newest(0).unwrap();
        assert_eq!(window.to_vec().unwrap(), vec![0, 2]);
        assert!(matches!(window.inc(2, 1), Err(ArrayError::InvalidIndex { index: 2, len: 2 })));
    }

    #[test]
    fn test_find_is_linear() {
        let window = LongSlidingWindow::from_values(4, &[5, 1, 9, 3]).unwrap();
        assert_eq!(window.find(9).unwrap(), Some(1));
        assert_eq!(window.find(5).unwrap(), Some(3));
        assert_eq!(window.find(4).unwrap(), None);
    }

    #[test]
    fn test_bytes_round_trip() {
        let window = LongSlidingWindow::from_values(4, &[1, 2, 3]).unwrap();
        let bytes = window.to_bytes().unwrap();
        let copy = LongSlidingWindow::from_bytes(4, &bytes).unwrap();
        assert_eq!(copy.to_vec().unwrap(), vec![3, 2, 1]);
        assert_eq!(copy.capacity(), 4);

        assert!(LongSlidingWindow::from_bytes(2, &bytes).is_err());
    }

    #[test]
    fn test_min_max() {
        let window = DoubleSlidingWindow::from_values(4, &[2.5, -1.0, 7.25]).unwrap();
        assert_eq!(window.min().unwrap(), Some(-1.0));
        assert_eq!(window.max().unwrap(), Some(7.25));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(LongSlidingWindow::new(0).is_err());
    }

    #[test]
    fn test_destroy() {
        let mut window = LongSlidingWindow::from_values(2, &[1]).unwrap();
        let copy = window.try_clone().unwrap();
        window.destroy();
        assert!(!window.is_live());
        assert!(matches!(window.insert(1), Err(ArrayError::UseAfterRelease)));
        assert!(matches!(window.newest(), Err(ArrayError::UseAfterRelease)));
        assert_eq!(copy.to_vec().unwrap(), vec![1]);
    }
}
