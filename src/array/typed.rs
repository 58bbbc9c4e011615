//! Typed numeric arrays over a managed slot region.
//!
//! `NumericArray<T>` interprets a [`ManagedArray`] as `i64` or `f64` values
//! and layers ordered insertion, binary search, sorting and byte
//! serialization on top of the region primitives.

use crate::array::managed::{ManagedArray, Roll};
use crate::array::slot::Slot;
use crate::array::sort;
use crate::core::{ArrayConfig, ArrayError, Result};
use bytes::{Bytes, BytesMut};
use std::fmt;
use std::marker::PhantomData;

/// Marker written after the last populated slot by [`NumericArray::to_full_string`]
pub const SIZE_MARKER: &str = ">><<,";

/// Array of 64-bit integers
pub type LongArray = NumericArray<i64>;

/// Array of 64-bit floating point values
pub type DoubleArray = NumericArray<f64>;

/// A managed slot array of `T` values.
pub struct NumericArray<T: Slot> {
    raw: ManagedArray,
    _slot: PhantomData<T>,
}

impl<T: Slot> NumericArray<T> {
    /// Create an empty array.
    pub fn new(config: ArrayConfig) -> Result<Self> {
        Ok(NumericArray {
            raw: ManagedArray::new(config, T::WIDTH)?,
            _slot: PhantomData,
        })
    }

    /// Create an array holding `values`, sorted first if the array is sorted.
    pub fn from_slice(config: ArrayConfig, values: &[T]) -> Result<Self> {
        let mut array = Self::new(config)?;
        array.append(values)?;
        Ok(array)
    }

    /// Create an array from the little-endian output of [`NumericArray::to_bytes`].
    pub fn from_bytes(config: ArrayConfig, bytes: &[u8]) -> Result<Self> {
        let mut array = Self::new(config)?;
        array.load_bytes(bytes)?;
        Ok(array)
    }

    /// The underlying slot region
    pub fn raw(&self) -> &ManagedArray {
        &self.raw
    }

    /// Number of values
    pub fn size(&self) -> usize {
        self.raw.size()
    }

    /// Returns true if the array holds no values
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of allocated slots
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Number of allocated slots, populated or not
    pub fn allocated_len(&self) -> usize {
        self.raw.capacity()
    }

    /// Construction parameters
    pub fn config(&self) -> &ArrayConfig {
        self.raw.config()
    }

    /// Returns true if the array is kept sorted
    pub fn sorted(&self) -> bool {
        self.raw.sorted()
    }

    /// Returns true if the array has a fixed capacity ceiling
    pub fn fixed(&self) -> bool {
        self.raw.fixed()
    }

    /// Capacity ceiling
    pub fn max_capacity(&self) -> usize {
        self.raw.max_capacity()
    }

    /// Returns true until the array is destroyed
    pub fn is_live(&self) -> bool {
        self.raw.is_live()
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Result<T> {
        self.raw.check_index(index)?;
        Ok(self.raw.slots::<T>()?[index])
    }

    /// Overwrite the value at `index`.
    ///
    /// On a sorted array the value must still fit between its neighbours,
    /// otherwise `InvalidOperationForMode` is returned.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.raw.check_index(index)?;
        if self.sorted() {
            let slots = self.raw.slots::<T>()?;
            let after_prev = index == 0 || slots[index - 1] <= value;
            let before_next = index + 1 == slots.len() || value <= slots[index + 1];
            if !(after_prev && before_next) {
                return Err(self.mode_error("set"));
            }
        }
        self.raw.slots_mut::<T>()?[index] = value;
        Ok(())
    }

    /// Add `delta` to the value at `index`, returning the new value.
    ///
    /// Integers wrap on overflow. Not available on sorted arrays.
    pub fn increment(&mut self, index: usize, delta: T) -> Result<T> {
        self.raw.check_index(index)?;
        if self.sorted() {
            return Err(self.mode_error("increment"));
        }
        let slot = &mut self.raw.slots_mut::<T>()?[index];
        *slot = slot.accumulate(delta);
        Ok(*slot)
    }

    /// Binary search over the populated slots.
    ///
    /// Returns the index of `key` if present, else `-(insertion point) - 1`.
    /// Which index is returned among duplicates is unspecified. Only
    /// meaningful on sorted contents.
    #[allow(clippy::cast_possible_wrap)]
    pub fn binary_search(&self, key: T) -> Result<isize> {
        let slots = self.raw.slots::<T>()?;
        let (mut low, mut high) = (0usize, slots.len());
        while low < high {
            let mid = low + (high - low) / 2;
            let value = slots[mid];
            if value < key {
                low = mid + 1;
            } else if value > key {
                high = mid;
            } else {
                return Ok(mid as isize);
            }
        }
        Ok(-(low as isize) - 1)
    }

    /// Index at which `key` is or would be inserted.
    #[allow(clippy::cast_sign_loss)]
    pub fn normalized_binary_search(&self, key: T) -> Result<usize> {
        let index = self.binary_search(key)?;
        Ok(if index < 0 { (-(index + 1)) as usize } else { index as usize })
    }

    /// Returns true if `key` is present, using binary search on sorted
    /// arrays and a linear scan otherwise.
    pub fn contains(&self, key: T) -> Result<bool> {
        if self.sorted() {
            Ok(self.binary_search(key)? >= 0)
        } else {
            Ok(self.position(key)?.is_some())
        }
    }

    /// Index of the first slot equal to `key`, by linear scan.
    pub fn position(&self, key: T) -> Result<Option<usize>> {
        Ok(self.raw.slots::<T>()?.iter().position(|v| *v == key))
    }

    /// Sort the populated slots in place.
    pub fn sort(&mut self) -> Result<()> {
        sort::sort(self.raw.slots_mut::<T>()?);
        Ok(())
    }

    /// Copy `values` to the tail, growing as needed. A sorted array is
    /// re-sorted afterwards.
    pub fn append(&mut self, values: &[T]) -> Result<()> {
        self.raw.ensure_live()?;
        if values.is_empty() {
            return Ok(());
        }
        self.raw.extend(false, values.len())?;
        self.write_tail(values)?;
        if self.sorted() {
            self.sort()?;
        }
        Ok(())
    }

    /// Append as many of `values` as fit under `max_capacity` and return the
    /// number discarded. A sorted array is re-sorted afterwards.
    pub fn append_what_fits(&mut self, values: &[T]) -> Result<usize> {
        self.raw.ensure_live()?;
        if values.is_empty() {
            return Ok(0);
        }
        self.raw.extend(true, values.len())?;
        let fits = values.len().min(self.raw.capacity() - self.raw.size());
        self.write_tail(&values[..fits])?;
        if self.sorted() {
            self.sort()?;
        }
        let discarded = values.len() - fits;
        if discarded > 0 {
            tracing::debug!(discarded, "append discarded values past max capacity");
        }
        Ok(discarded)
    }

    fn write_tail(&mut self, values: &[T]) -> Result<()> {
        let start = self.raw.size();
        let end = start + values.len();
        self.raw.allocated_mut::<T>()?[start..end].copy_from_slice(values);
        self.raw.set_size(end);
        Ok(())
    }

    /// Insert each value at its sorted position.
    ///
    /// Sorted arrays only. A failure part way through is reported as
    /// `PartialInsertFailure` carrying the number of values already inserted.
    pub fn insert(&mut self, values: &[T]) -> Result<()> {
        self.raw.ensure_live()?;
        if !self.sorted() {
            return Err(self.mode_error("insert"));
        }
        for (inserted, value) in values.iter().enumerate() {
            self.insert_sorted(*value)
                .map_err(|e| ArrayError::partial(inserted, e))?;
        }
        Ok(())
    }

    /// As [`NumericArray::insert`], skipping values already present. Returns
    /// the number of values inserted.
    pub fn insert_if_not_exists(&mut self, values: &[T]) -> Result<usize> {
        self.raw.ensure_live()?;
        if !self.sorted() {
            return Err(self.mode_error("insert_if_not_exists"));
        }
        let mut inserted = 0;
        for value in values {
            let found = self
                .binary_search(*value)
                .map_err(|e| ArrayError::partial(inserted, e))?;
            if found < 0 {
                self.insert_sorted(*value)
                    .map_err(|e| ArrayError::partial(inserted, e))?;
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn insert_sorted(&mut self, value: T) -> Result<()> {
        self.raw.extend(false, 1)?;
        let index = self.normalized_binary_search(value)?;
        self.raw.roll_right(index)?;
        self.raw.slots_mut::<T>()?[index] = value;
        Ok(())
    }

    /// Insert `value` at `index`, shifting later values right.
    ///
    /// On a sorted array `index` must be a valid position for `value`. A full
    /// fixed array drops its last value instead of growing.
    pub fn roll_right(&mut self, index: usize, value: T) -> Result<()> {
        self.roll_right_cap(index, value).map(|_| ())
    }

    /// As [`NumericArray::roll_right`], returning the value dropped from the
    /// tail when the array was fixed and full.
    pub fn roll_right_cap(&mut self, index: usize, value: T) -> Result<Option<T>> {
        self.raw.ensure_live()?;
        if self.sorted() && index <= self.size() && !self.fits_at(index, value)? {
            return Err(self.mode_error("roll_right"));
        }

        let tail = if self.raw.evicts_on_roll() {
            self.raw.slots::<T>()?.last().copied()
        } else {
            None
        };

        let roll = self.raw.roll_right(index)?;
        self.raw.slots_mut::<T>()?[index] = value;
        Ok(match roll {
            Roll::Evicted => tail,
            Roll::Opened => None,
        })
    }

    fn fits_at(&self, index: usize, value: T) -> Result<bool> {
        let slots = self.raw.slots::<T>()?;
        let after_prev = index == 0 || slots[index - 1] <= value;
        let before_next = index == slots.len() || value <= slots[index];
        Ok(after_prev && before_next)
    }

    /// Remove the first occurrence of each value, then shrink if applicable.
    /// Returns the number of values removed.
    pub fn remove(&mut self, values: &[T]) -> Result<usize> {
        self.raw.ensure_live()?;
        let mut removed = 0;
        for value in values {
            if let Some(index) = self.locate(*value)? {
                self.raw.roll_left(index, false)?;
                removed += 1;
            }
        }
        self.raw.shrink()?;
        Ok(removed)
    }

    /// Remove every occurrence of each value, then shrink if applicable.
    /// Returns the number of values removed.
    pub fn remove_all(&mut self, values: &[T]) -> Result<usize> {
        self.raw.ensure_live()?;
        let before = self.size();
        for value in values {
            if self.sorted() {
                while let Some(index) = self.locate(*value)? {
                    self.raw.roll_left(index, false)?;
                }
            } else {
                let mut index = 0;
                while index < self.size() {
                    if self.raw.slots::<T>()?[index] == *value {
                        self.raw.roll_left(index, false)?;
                    } else {
                        index += 1;
                    }
                }
            }
        }
        self.raw.shrink()?;
        Ok(before - self.size())
    }

    #[allow(clippy::cast_sign_loss)]
    fn locate(&self, value: T) -> Result<Option<usize>> {
        if self.sorted() {
            let index = self.binary_search(value)?;
            Ok((index >= 0).then_some(index as usize))
        } else {
            self.position(value)
        }
    }

    /// Remove the value at `index`, closing the gap, and return it.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let value = self.get(index)?;
        self.raw.roll_left(index, true)?;
        Ok(value)
    }

    /// Remove every value and shrink if applicable.
    pub fn clear(&mut self) -> Result<()> {
        self.raw.clear()
    }

    /// Copy of the populated values
    pub fn to_vec(&self) -> Result<Vec<T>> {
        Ok(self.raw.slots::<T>()?.to_vec())
    }

    /// Populated values converted to `f64`
    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        Ok(self.raw.slots::<T>()?.iter().map(|v| v.to_f64()).collect())
    }

    /// Copy of every allocated slot, populated or not
    pub fn allocated_to_vec(&self) -> Result<Vec<T>> {
        Ok(self.raw.allocated::<T>()?.to_vec())
    }

    /// Little-endian concatenation of the populated values.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let slots = self.raw.slots::<T>()?;
        let mut buf = BytesMut::with_capacity(slots.len() * T::WIDTH);
        for value in slots {
            value.put_le(&mut buf);
        }
        Ok(buf.freeze())
    }

    /// Replace the contents with the little-endian values in `bytes`.
    ///
    /// The region is reallocated to fit; a sorted array is sorted after loading.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.raw.load_bytes(bytes)?;
        if self.sorted() {
            self.sort()?;
        }
        Ok(())
    }

    /// Sum of the first `within` values, clamped to the size.
    pub fn sum_first(&self, within: usize) -> Result<T> {
        let slots = self.raw.slots::<T>()?;
        let within = within.min(slots.len());
        Ok(slots[..within].iter().fold(T::ZERO, |acc, v| acc.accumulate(*v)))
    }

    /// Smallest populated value
    pub fn min(&self) -> Result<Option<T>> {
        let slots = self.raw.slots::<T>()?;
        Ok(slots.iter().copied().reduce(|a, b| if b < a { b } else { a }))
    }

    /// Largest populated value
    pub fn max(&self) -> Result<Option<T>> {
        let slots = self.raw.slots::<T>()?;
        Ok(slots.iter().copied().reduce(|a, b| if b > a { b } else { a }))
    }

    /// Render every allocated slot, marking the last populated one with
    /// [`SIZE_MARKER`].
    pub fn to_full_string(&self) -> Result<String> {
        let slots = self.raw.allocated::<T>()?;
        let size = self.size();
        let mut out = String::from("fc:[");
        for (i, value) in slots.iter().enumerate() {
            out.push_str(&value.to_string());
            out.push_str(if i + 1 == size { SIZE_MARKER } else { "," });
        }
        if !slots.is_empty() {
            out.pop();
        }
        out.push(']');
        Ok(out)
    }

    /// Copy into a new, independently owned array.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(NumericArray {
            raw: self.raw.try_clone()?,
            _slot: PhantomData,
        })
    }

    /// Release the slot region. Idempotent.
    pub fn destroy(&mut self) {
        self.raw.destroy();
    }

    fn mode_error(&self, operation: &'static str) -> ArrayError {
        ArrayError::InvalidOperationForMode {
            operation,
            mode: self.config().mode(),
        }
    }
}

impl<T: Slot> PartialEq for NumericArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw.slots::<T>().ok() == other.raw.slots::<T>().ok()
    }
}

impl<T: Slot> fmt::Display for NumericArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(slots) = self.raw.slots::<T>() else {
            return f.write_str("[released]");
        };
        f.write_str("[")?;
        for (i, value) in slots.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

impl<T: Slot> fmt::Debug for NumericArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumericArray")
            .field("values", &self.raw.slots::<T>().ok())
            .field("raw", &self.raw)
            .finish()
    }
}
