//! Sliding window retention behaviour.

mod common;

use metric_slots::containers::{DoubleSlidingWindow, LongSlidingWindow};
use metric_slots::ArrayError;
use pretty_assertions::assert_eq;

#[test]
fn test_window_keeps_newest_samples() {
    let mut window = LongSlidingWindow::new(3).unwrap();
    assert_eq!(window.insert(1).unwrap(), None);
    assert_eq!(window.insert(2).unwrap(), None);
    assert_eq!(window.insert(3).unwrap(), None);
    assert!(window.is_full());

    assert_eq!(window.insert(4).unwrap(), Some(1));
    assert_eq!(window.to_vec().unwrap(), vec![4, 3, 2]);
    assert_eq!(window.sum().unwrap(), 9);
    assert_eq!(window.avg().unwrap(), 3);
    assert_eq!(window.capacity(), 3);
}

#[test]
fn test_window_eviction_order_over_many_inserts() {
    let mut window = LongSlidingWindow::new(10).unwrap();
    let mut evicted = Vec::new();
    for value in 0..50 {
        if let Some(old) = window.insert(value).unwrap() {
            evicted.push(old);
        }
    }
    assert_eq!(evicted, (0..40).collect::<Vec<_>>());
    assert_eq!(window.to_vec().unwrap(), (40..50).rev().collect::<Vec<_>>());
    assert_eq!(window.size(), 10);
}

#[test]
fn test_window_partial_statistics() {
    let window = LongSlidingWindow::from_values(5, &[10, 20, 30, 40]).unwrap();
    assert_eq!(window.to_vec().unwrap(), vec![40, 30, 20, 10]);
    assert_eq!(window.sum_within(2).unwrap(), 70);
    assert_eq!(window.avg_within(2).unwrap(), 35);
    assert_eq!(window.sum_within(100).unwrap(), 100);
    assert_eq!(window.avg_within(3).unwrap(), 30);
    assert_eq!(window.min().unwrap(), Some(10));
    assert_eq!(window.max().unwrap(), Some(40));
}

#[test]
fn test_window_average_truncates_and_handles_empty() {
    let mut window = LongSlidingWindow::new(4).unwrap();
    assert_eq!(window.avg().unwrap(), 0);
    assert_eq!(window.newest().unwrap(), None);

    window.insert_all(&[1, 2]).unwrap();
    assert_eq!(window.avg().unwrap(), 1);

    let zeros = LongSlidingWindow::from_values(4, &[5, -5]).unwrap();
    assert_eq!(zeros.avg().unwrap(), 0);
}

#[test]
fn test_double_window_average() {
    let window = DoubleSlidingWindow::from_values(3, &[1.0, 2.0, 4.5]).unwrap();
    assert_eq!(window.sum().unwrap(), 7.5);
    assert_eq!(window.avg().unwrap(), 2.5);
    assert_eq!(window.newest().unwrap(), Some(4.5));
}

#[test]
fn test_window_increment_and_overwrite() {
    let mut window = LongSlidingWindow::from_values(3, &[1, 2]).unwrap();
    assert_eq!(window.inc_newest(5).unwrap(), 7);
    assert_eq!(window.inc(1, -1).unwrap(), 0);
    window.set_newest(42).unwrap();
    assert_eq!(window.to_vec().unwrap(), vec![42, 0]);
    assert_eq!(window.find(0).unwrap(), Some(1));
    assert_eq!(window.find(99).unwrap(), None);
    assert_err!(window.inc(2, 1), ArrayError::InvalidIndex { index: 2, len: 2 });
}

#[test]
fn test_window_clear_keeps_capacity() {
    let mut window = LongSlidingWindow::from_values(6, &[1, 2, 3, 4, 5, 6, 7]).unwrap();
    window.clear().unwrap();
    assert!(window.is_empty());
    assert_eq!(window.capacity(), 6);
    window.insert_all(&[8, 9]).unwrap();
    assert_eq!(window.to_vec().unwrap(), vec![9, 8]);
}

#[test]
fn test_window_byte_round_trip() {
    let window = LongSlidingWindow::from_values(4, &[1, -2, 3]).unwrap();
    let bytes = window.to_bytes().unwrap();
    assert_eq!(bytes.len(), 24);
    assert_eq!(&bytes[..8], &3i64.to_le_bytes());

    let restored = LongSlidingWindow::from_bytes(4, &bytes).unwrap();
    assert_eq!(restored.to_vec().unwrap(), vec![3, -2, 1]);
    assert_eq!(restored.capacity(), 4);

    let mut restored = restored;
    assert_eq!(restored.insert(7).unwrap(), None);
    assert_eq!(restored.insert(8).unwrap(), Some(1));
}

#[test]
fn test_window_rejects_oversized_or_malformed_bytes() {
    let source = LongSlidingWindow::from_values(5, &[1, 2, 3, 4, 5]).unwrap();
    let bytes = source.to_bytes().unwrap();

    let mut small = LongSlidingWindow::new(3).unwrap();
    assert_err!(small.load_bytes(&bytes), ArrayError::AllocationOverflow { .. });
    assert_err!(small.load_bytes(&bytes[..7]), ArrayError::MalformedBytes { len: 7, width: 8 });
    assert!(small.is_empty());
}

#[test]
fn test_window_clone_is_independent() {
    let mut window = LongSlidingWindow::from_values(3, &[1, 2, 3]).unwrap();
    let copy = window.try_clone().unwrap();
    window.insert(4).unwrap();
    assert_eq!(copy.to_vec().unwrap(), vec![3, 2, 1]);
    assert_eq!(window.to_vec().unwrap(), vec![4, 3, 2]);
}

#[test]
fn test_window_use_after_destroy() {
    let mut window = LongSlidingWindow::from_values(3, &[1]).unwrap();
    window.destroy();
    window.destroy();
    assert!(!window.is_live());
    assert_err!(window.insert(2), ArrayError::UseAfterRelease);
    assert_err!(window.sum(), ArrayError::UseAfterRelease);
    assert_err!(window.to_vec(), ArrayError::UseAfterRelease);
}

#[test]
fn test_window_display() {
    let window = LongSlidingWindow::from_values(3, &[1, 2]).unwrap();
    assert_eq!(window.to_string(), "[2,1]");
}
