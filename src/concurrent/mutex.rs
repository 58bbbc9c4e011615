//! Full-mutex policy.

use super::LockPolicy;
use parking_lot::Mutex;
use std::fmt;

/// Every operation, read or write, takes the same lock.
#[derive(Debug, Default)]
pub struct Mutexed<C> {
    inner: Mutex<C>,
}

impl<C> Mutexed<C> {
    /// Wrap `inner`
    pub fn new(inner: C) -> Self {
        Mutexed {
            inner: Mutex::new(inner),
        }
    }
}

impl<C> LockPolicy<C> for Mutexed<C> {
    fn wrap(inner: C) -> Self {
        Self::new(inner)
    }

    fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}

impl<C: fmt::Display> fmt::Display for Mutexed<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|inner| fmt::Display::fmt(inner, f))
    }
}
