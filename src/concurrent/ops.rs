//! Container operations for any [`LockPolicy`].
//!
//! Mutators take the exclusive side of the policy, accessors the shared
//! side. Under [`Mutexed`](super::Mutexed) both map to the same lock.

use super::LockPolicy;
use crate::array::Slot;
use crate::containers::{SlidingWindow, SortedSet, Stack};
use crate::core::Result;
use bytes::Bytes;

/// Sliding window operations behind a lock
pub trait SharedWindow<T: Slot>: LockPolicy<SlidingWindow<T>> + Sized {
    /// Insert the newest sample, returning the evicted one
    fn insert(&self, value: T) -> Result<Option<T>> {
        self.write(|w| w.insert(value))
    }

    /// Insert each sample under one acquisition
    fn insert_all(&self, values: &[T]) -> Result<()> {
        self.write(|w| w.insert_all(values))
    }

    /// Add `delta` to the sample at `index`
    fn inc(&self, index: usize, delta: T) -> Result<T> {
        self.write(|w| w.inc(index, delta))
    }

    /// Overwrite the newest sample
    fn set_newest(&self, value: T) -> Result<()> {
        self.write(|w| w.set_newest(value))
    }

    /// Replace the samples from bytes
    fn load_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.write(|w| w.load_bytes(bytes))
    }

    /// Drop every sample
    fn clear(&self) -> Result<()> {
        self.write(SlidingWindow::clear)
    }

    /// Sample at `index`, newest first
    fn get(&self, index: usize) -> Result<T> {
        self.read(|w| w.get(index))
    }

    /// Number of samples
    fn size(&self) -> usize {
        self.read(SlidingWindow::size)
    }

    /// Window capacity
    fn capacity(&self) -> usize {
        self.read(SlidingWindow::capacity)
    }

    /// Returns true if no sample is held
    fn is_empty(&self) -> bool {
        self.read(SlidingWindow::is_empty)
    }

    /// Returns true once the window holds `capacity` samples
    fn is_full(&self) -> bool {
        self.read(SlidingWindow::is_full)
    }

    /// Most recent sample
    fn newest(&self) -> Result<Option<T>> {
        self.read(SlidingWindow::newest)
    }

    /// Sum of every sample
    fn sum(&self) -> Result<T> {
        self.read(SlidingWindow::sum)
    }

    /// Sum of the newest `within` samples
    fn sum_within(&self, within: usize) -> Result<T> {
        self.read(|w| w.sum_within(within))
    }

    /// Mean of every sample
    fn avg(&self) -> Result<T> {
        self.read(SlidingWindow::avg)
    }

    /// Mean of the newest `within` samples
    fn avg_within(&self, within: usize) -> Result<T> {
        self.read(|w| w.avg_within(within))
    }

    /// Smallest sample
    fn min(&self) -> Result<Option<T>> {
        self.read(SlidingWindow::min)
    }

    /// Largest sample
    fn max(&self) -> Result<Option<T>> {
        self.read(SlidingWindow::max)
    }

    /// Index of the newest sample equal to `value`
    fn find(&self, value: T) -> Result<Option<usize>> {
        self.read(|w| w.find(value))
    }

    /// Samples, newest first
    fn to_vec(&self) -> Result<Vec<T>> {
        self.read(SlidingWindow::to_vec)
    }

    /// Samples converted to `f64`, newest first
    fn to_f64_vec(&self) -> Result<Vec<f64>> {
        self.read(SlidingWindow::to_f64_vec)
    }

    /// Serialized samples
    fn to_bytes(&self) -> Result<Bytes> {
        self.read(SlidingWindow::to_bytes)
    }

    /// Copy into a new, unshared wrapper
    fn try_clone(&self) -> Result<Self> {
        let inner = self.read(SlidingWindow::try_clone)?;
        Ok(Self::wrap(inner))
    }

    /// Release the slot region
    fn destroy(&self) {
        self.write(SlidingWindow::destroy);
    }
}

impl<T: Slot, P: LockPolicy<SlidingWindow<T>>> SharedWindow<T> for P {}

/// Sorted set operations behind a lock
pub trait SharedSortedSet<T: Slot>: LockPolicy<SortedSet<T>> + Sized {
    /// Add the values not yet present
    fn add(&self, values: &[T]) -> Result<bool> {
        self.write(|s| s.add(values))
    }

    /// Remove the given values
    fn remove(&self, values: &[T]) -> Result<bool> {
        self.write(|s| s.remove(values))
    }

    /// Remove every value
    fn clear(&self) -> Result<()> {
        self.write(SortedSet::clear)
    }

    /// Returns true if `value` is present
    fn contains(&self, value: T) -> Result<bool> {
        self.read(|s| s.contains(value))
    }

    /// Value at `index` in ascending order
    fn get(&self, index: usize) -> Result<T> {
        self.read(|s| s.get(index))
    }

    /// Number of values
    fn size(&self) -> usize {
        self.read(SortedSet::size)
    }

    /// Values in ascending order
    fn to_vec(&self) -> Result<Vec<T>> {
        self.read(SortedSet::to_vec)
    }

    /// Serialized values
    fn to_bytes(&self) -> Result<Bytes> {
        self.read(SortedSet::to_bytes)
    }

    /// Copy into a new, unshared wrapper
    fn try_clone(&self) -> Result<Self> {
        let inner = self.read(SortedSet::try_clone)?;
        Ok(Self::wrap(inner))
    }

    /// Release the slot region
    fn destroy(&self) {
        self.write(SortedSet::destroy);
    }
}

impl<T: Slot, P: LockPolicy<SortedSet<T>>> SharedSortedSet<T> for P {}

/// Stack operations behind a lock
pub trait SharedStack<T: Slot>: LockPolicy<Stack<T>> + Sized {
    /// Push each value in turn
    fn push(&self, values: &[T]) -> Result<()> {
        self.write(|s| s.push(values))
    }

    /// Remove and return the top value
    fn pop(&self) -> Result<Option<T>> {
        self.write(Stack::pop)
    }

    /// Remove every value
    fn clear(&self) -> Result<()> {
        self.write(Stack::clear)
    }

    /// Top value
    fn peek(&self) -> Result<Option<T>> {
        self.read(Stack::peek)
    }

    /// Value `index` positions below the top
    fn get(&self, index: usize) -> Result<T> {
        self.read(|s| s.get(index))
    }

    /// Number of values
    fn size(&self) -> usize {
        self.read(Stack::size)
    }

    /// Values that can still be pushed
    fn empty_slots_free(&self) -> usize {
        self.read(Stack::empty_slots_free)
    }

    /// Values from top to bottom
    fn to_vec(&self) -> Result<Vec<T>> {
        self.read(Stack::to_vec)
    }

    /// Copy into a new, unshared wrapper
    fn try_clone(&self) -> Result<Self> {
        let inner = self.read(Stack::try_clone)?;
        Ok(Self::wrap(inner))
    }

    /// Release the slot region
    fn destroy(&self) {
        self.write(Stack::destroy);
    }
}

impl<T: Slot, P: LockPolicy<Stack<T>>> SharedStack<T> for P {}
