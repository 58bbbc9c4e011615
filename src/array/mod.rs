//! Off-heap numeric slot arrays.
//!
//! Layers, leaves first:
//! - `managed`: one owned region with growth, shrink and slot shifting
//! - `sort`: hybrid run-merge and dual-pivot quicksort
//! - `typed`: `i64`/`f64` views with ordered insert, search and serialization

pub mod managed;
pub mod slot;
pub mod sort;
pub mod typed;

pub use managed::{live_regions, ManagedArray, Roll, Shift};
pub use slot::Slot;
pub use typed::{DoubleArray, LongArray, NumericArray};
