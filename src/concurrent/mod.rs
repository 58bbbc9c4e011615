//! Thread-safe wrappers around a single owned container.
//!
//! A [`LockPolicy`] pairs one lock with one container. Two policies exist:
//! - [`RwLocked`]: shared lock for reads, exclusive lock for mutation
//! - [`Mutexed`]: one mutex for every operation
//!
//! Container operations are provided for any policy through the extension
//! traits in [`ops`], so a window or stack can be moved between policies
//! without touching call sites. Every acquisition is scoped to a closure and
//! released on all exit paths, including errors and panics.

pub mod mutex;
pub mod ops;
pub mod rwlock;

pub use mutex::Mutexed;
pub use ops::{SharedSortedSet, SharedStack, SharedWindow};
pub use rwlock::RwLocked;

use crate::containers::{SlidingWindow, SortedSet, Stack};

/// Sliding window behind a reader/writer lock
pub type ConcurrentSlidingWindow<T> = RwLocked<SlidingWindow<T>>;

/// Stack behind a reader/writer lock
pub type ConcurrentStack<T> = RwLocked<Stack<T>>;

/// Sorted set behind a single mutex
pub type SynchronizedSortedSet<T> = Mutexed<SortedSet<T>>;

/// Locking discipline around exactly one owned container.
pub trait LockPolicy<C> {
    /// Take ownership of `inner`
    fn wrap(inner: C) -> Self
    where
        Self: Sized;

    /// Run `f` with shared access.
    fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R;

    /// Run `f` with exclusive access.
    fn write<R>(&self, f: impl FnOnce(&mut C) -> R) -> R;

    /// Give the container back
    fn into_inner(self) -> C
    where
        Self: Sized;
}
