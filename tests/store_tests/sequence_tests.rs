//! Sequence Tests
//!
//! Tests verify:
//! - Match enumeration order and copying
//! - Append / overwrite / remove by position
//! - Out-of-range detection, including negative indexes

use recstore::store::{Record, Sequence};
use recstore::StoreError;

// =============================================================================
// Search Tests
// =============================================================================

#[test]
fn test_new_sequence_is_empty() {
    let sequence = Sequence::new();
    assert_eq!(sequence.len(), 0);
    assert!(sequence.is_empty());
    assert!(sequence.snapshot_matches(0).is_empty());
}

#[test]
fn test_snapshot_matches_in_index_order() {
    let sequence = Sequence::from_values(vec![5, 3, 5, 1, 5]);

    let matches = sequence.snapshot_matches(5);

    assert_eq!(
        matches,
        vec![Record::new(0, 5), Record::new(2, 5), Record::new(4, 5)]
    );
}

#[test]
fn test_snapshot_matches_no_hit() {
    let sequence = Sequence::from_values(vec![1, 2, 3]);
    assert!(sequence.snapshot_matches(9).is_empty());
}

#[test]
fn test_snapshot_is_a_copy() {
    let mut sequence = Sequence::from_values(vec![7, 7]);

    let mut matches = sequence.snapshot_matches(7);
    matches[0].value = 100;
    assert_eq!(sequence.as_slice(), &[7, 7]);

    sequence.set_at(1, 8).unwrap();
    assert_eq!(matches[1], Record::new(1, 7));
}

// =============================================================================
// Mutation Tests
// =============================================================================

#[test]
fn test_append_extends_by_one() {
    let mut sequence = Sequence::from_values(vec![1]);

    sequence.append(2);
    sequence.append(3);

    assert_eq!(sequence.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_set_at_overwrites() {
    let mut sequence = Sequence::from_values(vec![5, 3, 5, 1]);

    sequence.set_at(0, 9).unwrap();

    assert_eq!(sequence.as_slice(), &[9, 3, 5, 1]);
}

#[test]
fn test_remove_at_shifts_later_positions() {
    let mut sequence = Sequence::from_values(vec![1, 2, 3, 4]);

    let removed = sequence.remove_at(1).unwrap();

    assert_eq!(removed, 2);
    assert_eq!(sequence.as_slice(), &[1, 3, 4]);
    assert_eq!(sequence.get(1).unwrap(), 3);
}

// =============================================================================
// Out-of-range Tests
// =============================================================================

#[test]
fn test_set_at_past_end_fails() {
    let mut sequence = Sequence::from_values(vec![1, 2]);

    let err = sequence.set_at(2, 9).unwrap_err();

    assert!(matches!(err, StoreError::OutOfRange { index: 2, len: 2 }));
    assert_eq!(sequence.as_slice(), &[1, 2]);
}

#[test]
fn test_set_at_negative_fails() {
    let mut sequence = Sequence::from_values(vec![1, 2]);

    let err = sequence.set_at(-1, 9).unwrap_err();

    assert!(matches!(err, StoreError::OutOfRange { index: -1, len: 2 }));
    assert_eq!(sequence.as_slice(), &[1, 2]);
}

#[test]
fn test_remove_at_out_of_range_fails() {
    let mut sequence = Sequence::from_values(vec![1, 2, 3]);

    assert!(matches!(
        sequence.remove_at(3),
        Err(StoreError::OutOfRange { index: 3, len: 3 })
    ));
    assert!(matches!(
        sequence.remove_at(-5),
        Err(StoreError::OutOfRange { index: -5, len: 3 })
    ));
    assert_eq!(sequence.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_empty_sequence_rejects_every_index() {
    let mut sequence = Sequence::new();

    assert!(sequence.set_at(0, 1).is_err());
    assert!(sequence.remove_at(0).is_err());
    assert!(sequence.get(0).is_err());
}

#[test]
fn test_out_of_range_message_names_index_and_len() {
    let sequence = Sequence::from_values(vec![1]);

    let err = sequence.position(4).unwrap_err();

    assert_eq!(err.to_string(), "Index 4 out of range for sequence of length 1");
}
