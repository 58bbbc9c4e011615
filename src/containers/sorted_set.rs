//! Sorted, duplicate-free set of numeric values.

use crate::array::{NumericArray, Slot};
use crate::core::{config::DEFAULT_CAPACITY, ArrayConfig, ArrayError, Result};
use bytes::Bytes;
use std::fmt;

/// Set of `i64` values
pub type LongSortedSet = SortedSet<i64>;

/// Set of `f64` values
pub type DoubleSortedSet = SortedSet<f64>;

/// Values kept in ascending order without duplicates.
///
/// Uniqueness is enforced on insert by binary search; the set grows on
/// demand and shrinks after removals.
pub struct SortedSet<T: Slot> {
    array: NumericArray<T>,
}

impl<T: Slot> SortedSet<T> {
    /// Create an empty set with the default initial capacity.
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty set with room for `initial_capacity` values.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self> {
        Self::with_config(ArrayConfig::sorted_set(initial_capacity))
    }

    /// Create an empty set from explicit array parameters; the array is
    /// always kept sorted.
    pub fn with_config(config: ArrayConfig) -> Result<Self> {
        let config = ArrayConfig { sorted: true, ..config };
        Ok(SortedSet {
            array: NumericArray::new(config)?,
        })
    }

    /// Create a set holding the distinct `values`.
    pub fn from_values(values: &[T]) -> Result<Self> {
        let mut set = Self::with_capacity(values.len().max(1))?;
        set.add(values)?;
        Ok(set)
    }

    /// Create a set from little-endian values, dropping duplicates.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % T::WIDTH != 0 {
            return Err(ArrayError::MalformedBytes {
                len: bytes.len(),
                width: T::WIDTH,
            });
        }
        let values: Vec<T> = bytes
            .chunks_exact(T::WIDTH)
            .map(|mut chunk| T::get_le(&mut chunk))
            .collect();
        Self::from_values(&values)
    }

    /// Add the values not yet present. Returns true if the set changed.
    pub fn add(&mut self, values: &[T]) -> Result<bool> {
        Ok(self.array.insert_if_not_exists(values)? > 0)
    }

    /// Returns true if `value` is present.
    pub fn contains(&self, value: T) -> Result<bool> {
        Ok(self.array.binary_search(value)? >= 0)
    }

    /// Remove the given values. Returns true if the set changed.
    pub fn remove(&mut self, values: &[T]) -> Result<bool> {
        Ok(self.array.remove(values)? > 0)
    }

    /// Value at `index` in ascending order.
    pub fn get(&self, index: usize) -> Result<T> {
        self.array.get(index)
    }

    /// Smallest value
    pub fn first(&self) -> Result<Option<T>> {
        self.edge(0)
    }

    /// Largest value
    pub fn last(&self) -> Result<Option<T>> {
        self.edge(self.size().saturating_sub(1))
    }

    fn edge(&self, index: usize) -> Result<Option<T>> {
        self.array.raw().ensure_live()?;
        if self.is_empty() {
            return Ok(None);
        }
        self.array.get(index).map(Some)
    }

    /// Number of values
    pub fn size(&self) -> usize {
        self.array.size()
    }

    /// Allocated slots
    pub fn capacity(&self) -> usize {
        self.array.capacity()
    }

    /// Returns true if the set is empty
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Remove every value; capacity may shrink.
    pub fn clear(&mut self) -> Result<()> {
        self.array.clear()
    }

    /// Values in ascending order
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.array.to_vec()
    }

    /// Values converted to `f64`, ascending
    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        self.array.to_f64_vec()
    }

    /// Little-endian concatenation of the values in ascending order.
    pub fn to_bytes(&self) -> Result<Bytes> {
        self.array.to_bytes()
    }

    /// Copy into a new set with its own region.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(SortedSet {
            array: self.array.try_clone()?,
        })
    }

    /// Release the slot region. Idempotent.
    pub fn destroy(&mut self) {
        self.array.destroy();
    }

    /// Returns true until the set is destroyed
    pub fn is_live(&self) -> bool {
        self.array.is_live()
    }
}

impl<T: Slot> PartialEq for SortedSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.array == other.array
    }
}

impl<T: Slot> fmt::Display for SortedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.array, f)
    }
}

impl<T: Slot> fmt::Debug for SortedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.array.to_vec().unwrap_or_default())
            .finish()
    }
}
