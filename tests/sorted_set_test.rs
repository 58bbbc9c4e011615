//! Sorted set ordering and uniqueness.

mod common;

use common::assert_sorted;
use metric_slots::containers::{DoubleSortedSet, LongSortedSet};
use metric_slots::core::ArrayConfig;
use metric_slots::ArrayError;
use pretty_assertions::assert_eq;

#[test]
fn test_add_orders_and_deduplicates() {
    let mut set = LongSortedSet::new().unwrap();
    assert!(set.add(&[5, 1, 3, 1, 2]).unwrap());
    assert_eq!(set.size(), 4);
    assert_eq!(set.to_vec().unwrap(), vec![1, 2, 3, 5]);
    assert!(set.contains(3).unwrap());
    assert!(!set.contains(4).unwrap());

    // nothing new
    assert!(!set.add(&[1, 5]).unwrap());
    assert_eq!(set.size(), 4);
}

#[test]
fn test_remove_reports_change() {
    let mut set = LongSortedSet::from_values(&[10, 20, 30]).unwrap();
    assert!(set.remove(&[20, 99]).unwrap());
    assert!(!set.remove(&[99]).unwrap());
    assert_eq!(set.to_vec().unwrap(), vec![10, 30]);
    assert_eq!(set.first().unwrap(), Some(10));
    assert_eq!(set.last().unwrap(), Some(30));
}

#[test]
fn test_empty_set_edges() {
    let set = LongSortedSet::with_capacity(4).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.first().unwrap(), None);
    assert_eq!(set.last().unwrap(), None);
    assert_err!(set.get(0), ArrayError::InvalidIndex { index: 0, len: 0 });
}

#[test]
fn test_set_grows_past_initial_capacity() {
    let mut set = LongSortedSet::with_capacity(2).unwrap();
    let values: Vec<i64> = (0..300).rev().map(|v| v * 3 % 301).collect();
    set.add(&values).unwrap();
    assert_eq!(set.size(), 300);
    let contents = set.to_vec().unwrap();
    assert_sorted(&contents);
    assert!(set.capacity() >= 300);
}

#[test]
fn test_negative_and_float_values() {
    let mut set = DoubleSortedSet::new().unwrap();
    set.add(&[0.5, -2.25, 3.0, -2.25, 0.0]).unwrap();
    assert_eq!(set.to_vec().unwrap(), vec![-2.25, 0.0, 0.5, 3.0]);
    assert!(set.contains(-2.25).unwrap());
    assert_eq!(set.get(1).unwrap(), 0.0);
}

#[test]
fn test_clear_then_reuse() {
    let mut set = LongSortedSet::from_values(&[3, 2, 1]).unwrap();
    set.clear().unwrap();
    assert!(set.is_empty());
    set.add(&[7, 6]).unwrap();
    assert_eq!(set.to_vec().unwrap(), vec![6, 7]);
}

#[test]
fn test_set_from_bytes_drops_duplicates() {
    let mut bytes = Vec::new();
    for value in [4i64, 2, 4, 9] {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    let set = LongSortedSet::from_bytes(&bytes).unwrap();
    assert_eq!(set.to_vec().unwrap(), vec![2, 4, 9]);

    let restored = LongSortedSet::from_bytes(&set.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, set);

    assert_err!(LongSortedSet::from_bytes(&bytes[..5]), ArrayError::MalformedBytes { len: 5, width: 8 });
}

#[test]
fn test_with_config_forces_ordering() {
    let config = ArrayConfig {
        sorted: false,
        ..ArrayConfig::default()
    };
    let mut set = LongSortedSet::with_config(config).unwrap();
    set.add(&[3, 1, 2]).unwrap();
    assert_eq!(set.to_vec().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_bounded_set_reports_partial_add() {
    let config = ArrayConfig::builder()
        .initial_capacity(2)
        .max_capacity(3)
        .min_capacity(1)
        .allocation_increment(1)
        .build()
        .unwrap();
    let mut set = LongSortedSet::with_config(config).unwrap();
    let err = set.add(&[1, 2, 3, 4, 5]).unwrap_err();
    assert_eq!(err.inserted_count(), Some(3));
    assert_eq!(set.to_vec().unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_set_clone_and_destroy() {
    let mut set = LongSortedSet::from_values(&[1, 2]).unwrap();
    let copy = set.try_clone().unwrap();
    set.destroy();
    assert!(!set.is_live());
    assert_err!(set.contains(1), ArrayError::UseAfterRelease);
    assert_err!(set.first(), ArrayError::UseAfterRelease);
    assert_eq!(copy.to_vec().unwrap(), vec![1, 2]);
    assert_eq!(copy.to_string(), "[1,2]");
}
