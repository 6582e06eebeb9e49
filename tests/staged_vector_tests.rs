#![cfg(feature = "vector")]
//! Integration tests for StagedVector.
//!
//! Covers the staged transform model: transforms attach to the segments
//! that exist when they are staged, run only during reads, and bounded
//! reads stop processing as soon as the answer is complete.

use reseq::vector::StagedVector;
use rstest::rstest;
use std::cell::Cell;
use std::rc::Rc;

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_new_has_no_segments() {
    let empty: StagedVector<i32> = StagedVector::new();
    assert_eq!(empty.segment_count(), 0);
    assert!(empty.to_vec().is_empty());
}

#[rstest]
fn test_of_collects_into_one_segment() {
    let numbers = StagedVector::of(1..=4);
    assert_eq!(numbers.segment_count(), 1);
    assert_eq!(numbers.to_vec(), vec![1, 2, 3, 4]);
}

#[rstest]
fn test_from_vec_and_from_iterator() {
    let from_vec = StagedVector::from(vec![1, 2, 3]);
    assert_eq!(from_vec.to_vec(), vec![1, 2, 3]);

    let collected: StagedVector<i32> = (1..=3).collect();
    assert_eq!(collected.to_vec(), vec![1, 2, 3]);

    let defaulted: StagedVector<i32> = StagedVector::default();
    assert_eq!(defaulted.segment_count(), 0);
}

// =============================================================================
// Staged Transforms
// =============================================================================

#[rstest]
fn test_map_and_filter_chain_in_place() {
    let mut numbers = StagedVector::of(1..=6);
    numbers.map(|n| n * 10).filter(|n| *n > 20);
    assert_eq!(numbers.to_vec(), vec![30, 40, 50, 60]);
}

#[rstest]
fn test_transforms_do_not_run_until_a_read() {
    let calls = Rc::new(Cell::new(0));
    let observed = Rc::clone(&calls);

    let mut numbers = StagedVector::of(1..=5);
    numbers.map(move |n| {
        observed.set(observed.get() + 1);
        n
    });

    assert_eq!(calls.get(), 0);
    let _ = numbers.to_vec();
    assert_eq!(calls.get(), 5);
}

#[rstest]
fn test_transforms_rerun_on_every_read() {
    let calls = Rc::new(Cell::new(0));
    let observed = Rc::clone(&calls);

    let mut numbers = StagedVector::of(1..=3);
    numbers.map(move |n| {
        observed.set(observed.get() + 1);
        n + 1
    });

    assert_eq!(numbers.to_vec(), vec![2, 3, 4]);
    assert_eq!(numbers.to_vec(), vec![2, 3, 4]);
    assert_eq!(calls.get(), 6);
}

#[rstest]
fn test_later_segments_skip_earlier_transforms() {
    let mut numbers = StagedVector::of(1..=4);
    numbers
        .filter(|n| n % 2 == 0)
        .concat(vec![5, 6, 7, 8])
        .filter(|n| n % 2 == 0);

    // The first filter never sees 5..=8; the second sees everything.
    assert_eq!(numbers.to_vec(), vec![2, 4, 6, 8]);
}

#[rstest]
fn test_append_and_prepend_extend_structurally() {
    let mut numbers = StagedVector::of(vec![2, 3]);
    numbers.map(|n| n * 10).prepend(1).append(4);

    assert_eq!(numbers.to_vec(), vec![1, 20, 30, 4]);
    assert_eq!(numbers.segment_count(), 3);
}

// =============================================================================
// Bounded Reads
// =============================================================================

#[rstest]
fn test_take_accepts_across_segments() {
    let mut numbers = StagedVector::of(1..=4);
    numbers
        .filter(|n| n % 2 == 0)
        .concat(vec![5, 6, 7, 8])
        .filter(|n| n % 2 == 0);

    assert_eq!(numbers.take(3).to_vec(), vec![2, 4, 6]);
}

#[rstest]
fn test_take_processes_only_what_it_needs() {
    let calls = Rc::new(Cell::new(0));
    let observed = Rc::clone(&calls);

    let mut numbers = StagedVector::of(1..=100);
    numbers.map(move |n| {
        observed.set(observed.get() + 1);
        n
    });

    assert_eq!(numbers.take(4).to_vec(), vec![1, 2, 3, 4]);
    assert_eq!(calls.get(), 4);
}

#[rstest]
fn test_take_more_than_available_accepts_everything() {
    let mut numbers = StagedVector::of(1..=4);
    numbers.filter(|n| n % 2 == 0);
    assert_eq!(numbers.take(10).to_vec(), vec![2, 4]);
}

#[rstest]
fn test_take_leaves_the_source_unchanged() {
    let mut numbers = StagedVector::of(1..=6);
    numbers.filter(|n| n % 2 == 0);

    let page = numbers.take(2);
    assert_eq!(page.to_vec(), vec![2, 4]);
    assert_eq!(page.segment_count(), 1);
    assert_eq!(numbers.to_vec(), vec![2, 4, 6]);
}

#[rstest]
fn test_get_without_transforms_walks_raw_segments() {
    let mut numbers = StagedVector::of(vec![10, 11]);
    numbers.concat(vec![12, 13]).prepend(9);

    assert_eq!(numbers.get(0), Some(9));
    assert_eq!(numbers.get(2), Some(11));
    assert_eq!(numbers.get(4), Some(13));
    assert_eq!(numbers.get(5), None);
}

#[rstest]
fn test_get_with_transforms_reads_the_accepted_position() {
    let mut numbers = StagedVector::of(1..=10);
    numbers.filter(|n| n % 3 == 0).map(|n| n * 100);

    assert_eq!(numbers.get(0), Some(300));
    assert_eq!(numbers.get(2), Some(900));
    assert_eq!(numbers.get(3), None);
}

#[rstest]
fn test_get_with_transforms_stops_early() {
    let calls = Rc::new(Cell::new(0));
    let observed = Rc::clone(&calls);

    let mut numbers = StagedVector::of(1..=100);
    numbers.map(move |n| {
        observed.set(observed.get() + 1);
        n
    });

    assert_eq!(numbers.get(2), Some(3));
    assert_eq!(calls.get(), 3);
}
