//! metric_slots - Self-managed numeric slot arrays for metric retention.
//!
//! A monitoring agent keeps thousands of rolling samples (timers, counters,
//! gauges) per collection cycle. This crate stores them in fixed-width slot
//! regions that it allocates, grows, shrinks and frees itself, and builds the
//! retention containers the agent needs on top.
//!
//! # Features
//!
//! - **Managed regions**: zero-filled allocation, stepwise growth, threshold shrink
//! - **Typed arrays**: `i64`/`f64` with binary search, hybrid sort, ordered insert
//! - **Containers**: sliding window, sorted set and stack
//! - **Concurrency**: reader/writer-lock and mutex wrappers
//! - **Serialization**: little-endian byte round trip
//!
//! # Architecture
//!
//! Dependencies point downward only:
//! - `concurrent`: lock policies wrapping one container each
//! - `containers`: `SlidingWindow`, `SortedSet`, `Stack`
//! - `array`: `NumericArray` over `ManagedArray`
//! - `core`: configuration and errors
//! - `cli`: command-line interface
//!
//! # Example
//!
//! ```
//! use metric_slots::containers::LongSlidingWindow;
//!
//! fn main() -> metric_slots::Result<()> {
//!     let mut window = LongSlidingWindow::new(3)?;
//!     window.insert_all(&[1, 2, 3, 4])?;
//!     assert_eq!(window.to_vec()?, vec![4, 3, 2]);
//!     assert_eq!(window.sum()?, 9);
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod array;
pub mod cli;
pub mod concurrent;
pub mod containers;
pub mod core;

// Re-export core types for convenience
pub use crate::array::{live_regions, DoubleArray, LongArray, NumericArray, Slot};
pub use crate::concurrent::{
    ConcurrentSlidingWindow, ConcurrentStack, LockPolicy, Mutexed, RwLocked, SharedSortedSet,
    SharedStack, SharedWindow, SynchronizedSortedSet,
};
pub use crate::containers::{SlidingWindow, SortedSet, Stack};
pub use crate::core::{ArrayConfig, ArrayError, Config, Result};
