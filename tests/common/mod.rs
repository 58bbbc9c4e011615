//! Common test utilities and fixtures.

#![allow(dead_code)]

use metric_slots::array::{ManagedArray, NumericArray, Slot};
use metric_slots::core::ArrayConfig;
use std::fmt::Debug;

/// Builder for array configurations with small, test-friendly defaults.
pub struct TestConfigBuilder {
    initial: usize,
    max: usize,
    min: usize,
    increment: usize,
    threshold: usize,
    sorted: bool,
    fixed: bool,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            initial: 8,
            max: 256,
            min: 2,
            increment: 4,
            threshold: 4,
            sorted: false,
            fixed: false,
        }
    }

    pub fn initial(mut self, slots: usize) -> Self {
        self.initial = slots;
        self
    }

    pub fn max(mut self, slots: usize) -> Self {
        self.max = slots;
        self
    }

    pub fn min(mut self, slots: usize) -> Self {
        self.min = slots;
        self
    }

    pub fn increment(mut self, slots: usize) -> Self {
        self.increment = slots;
        self
    }

    pub fn threshold(mut self, slots: usize) -> Self {
        self.threshold = slots;
        self
    }

    pub fn sorted(mut self) -> Self {
        self.sorted = true;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn build(self) -> ArrayConfig {
        ArrayConfig::builder()
            .initial_capacity(self.initial)
            .max_capacity(self.max)
            .min_capacity(self.min)
            .allocation_increment(self.increment)
            .cleared_slots_free_threshold(self.threshold)
            .sorted(self.sorted)
            .fixed(self.fixed)
            .build()
            .unwrap()
    }
}

/// Verify the size/capacity bounds every array must keep.
pub fn assert_bounds(raw: &ManagedArray) {
    assert!(raw.size() <= raw.capacity(), "size {} exceeds capacity {}", raw.size(), raw.capacity());
    assert!(
        raw.capacity() <= raw.max_capacity(),
        "capacity {} exceeds max {}",
        raw.capacity(),
        raw.max_capacity()
    );
}

/// Verify values are in non-decreasing order.
pub fn assert_sorted<T: PartialOrd + Debug>(values: &[T]) {
    for i in 1..values.len() {
        assert!(values[i - 1] <= values[i], "out of order at {}: {:?}", i, values);
    }
}

/// Verify bounds and, for sorted arrays, order.
pub fn assert_array_invariants<T: Slot>(array: &NumericArray<T>) {
    assert_bounds(array.raw());
    if array.sorted() {
        assert_sorted(&array.to_vec().unwrap());
    }
}

/// Macro for asserting an error variant.
#[macro_export]
macro_rules! assert_err {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {},
            other => panic!("expected {}, got {:?}", stringify!($pattern), other),
        }
    };
}
