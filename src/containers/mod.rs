//! Metric retention containers built on [`NumericArray`](crate::array::NumericArray).

pub mod sorted_set;
pub mod stack;
pub mod window;

pub use sorted_set::{DoubleSortedSet, LongSortedSet, SortedSet};
pub use stack::{DoubleStack, LongStack, Stack};
pub use window::{DoubleSlidingWindow, LongSlidingWindow, SlidingWindow};
