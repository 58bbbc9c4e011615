//! Reader/writer-lock policy.

use super::LockPolicy;
use parking_lot::RwLock;
use std::fmt;

/// Many concurrent readers or one writer.
///
/// Writers are serialized against each other and against readers, so a
/// reader never observes a half-shifted array.
#[derive(Debug, Default)]
pub struct RwLocked<C> {
    inner: RwLock<C>,
}

impl<C> RwLocked<C> {
    /// Wrap `inner`
    pub fn new(inner: C) -> Self {
        RwLocked {
            inner: RwLock::new(inner),
        }
    }
}

impl<C> LockPolicy<C> for RwLocked<C> {
    fn wrap(inner: C) -> Self {
        Self::new(inner)
    }

    fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}

impl<C: fmt::Display> fmt::Display for RwLocked<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|inner| fmt::Display::fmt(inner, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concurrent::{ConcurrentSlidingWindow, SharedWindow};
    use crate::containers::LongSlidingWindow;

    #[test]
    fn test_read_and_write_closures() {
        let window = ConcurrentSlidingWindow::new(LongSlidingWindow::new(3).unwrap());
        window.write(|w| w.insert_all(&[1, 2, 3, 4])).unwrap();
        let (size, sum) = window.read(|w| (w.size(), w.sum()));
        assert_eq!(size, 3);
        assert_eq!(sum.unwrap(), 9);
        assert_eq!(window.to_string(), "[4,3,2]");
    }

    #[test]
    fn test_lock_released_after_error() {
        let window = ConcurrentSlidingWindow::new(LongSlidingWindow::new(2).unwrap());
        assert!(window.get(5).is_err());
        window.insert(1).unwrap();
        assert_eq!(window.size(), 1);
    }

    #[test]
    fn test_into_inner() {
        let window = RwLocked::new(LongSlidingWindow::from_values(2, &[7]).unwrap());
        let inner = window.into_inner();
        assert_eq!(inner.to_vec().unwrap(), vec![7]);
    }
}
