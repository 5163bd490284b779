use std::collections::VecDeque;

use patchable::{apply, FailureReason, Operation};
use proptest::prelude::*;
use serde_json::json;

fn items_and_index() -> impl Strategy<Value = (Vec<i32>, usize)> {
    prop::collection::vec(any::<i32>(), 0..16).prop_flat_map(|items| {
        let len = items.len();
        (Just(items), 0..=len)
    })
}

fn non_empty_and_index() -> impl Strategy<Value = (Vec<i32>, usize)> {
    prop::collection::vec(any::<i32>(), 1..16).prop_flat_map(|items| {
        let len = items.len();
        (Just(items), 0..len)
    })
}

proptest! {
    /// Adding at `i` shifts the elements from `i` on by one.
    #[test]
    fn prop_add_inserts_and_shifts((items, i) in items_and_index(), value in any::<i32>()) {
        let mut target = items.clone();
        let result = apply(&mut target, &[Operation::add(format!("/{i}"), json!(value))]);
        prop_assert!(result.succeeded);

        let mut expected = items;
        expected.insert(i, value);
        prop_assert_eq!(target, expected);
    }

    /// `-` and the current length address the same append slot.
    #[test]
    fn prop_append_marker_equals_length(items in prop::collection::vec(any::<i32>(), 0..16), value in any::<i32>()) {
        let mut by_marker: VecDeque<i32> = items.iter().copied().collect();
        let mut by_index = by_marker.clone();
        let len = items.len();

        prop_assert!(apply(&mut by_marker, &[Operation::add("/-", json!(value))]).succeeded);
        let path = format!("/{}", len);
        prop_assert!(apply(&mut by_index, &[Operation::add(path, json!(value))]).succeeded);
        prop_assert_eq!(&by_marker, &by_index);
        prop_assert_eq!(by_marker.back().copied(), Some(value));
    }

    /// Adding past the end is rejected and leaves the collection alone.
    #[test]
    fn prop_add_past_end_fails(items in prop::collection::vec(any::<i32>(), 0..16), extra in 1usize..8) {
        let mut target = items.clone();
        let index = items.len() + extra;
        let result = apply(&mut target, &[Operation::add(format!("/{index}"), json!(0))]);
        prop_assert_eq!(result.failure_reason, Some(FailureReason::OperationFailed));
        prop_assert_eq!(target, items);
    }

    /// Removing at `i` closes the gap.
    #[test]
    fn prop_remove_closes_gap((items, i) in non_empty_and_index()) {
        let mut target = items.clone();
        let path = format!("/{}", i);
        prop_assert!(apply(&mut target, &[Operation::remove(path)]).succeeded);

        let mut expected = items;
        expected.remove(i);
        prop_assert_eq!(target, expected);
    }

    /// Replacing keeps the length and touches only one element.
    #[test]
    fn prop_replace_preserves_length((items, i) in non_empty_and_index(), value in any::<i32>()) {
        let mut target = items.clone();
        let path = format!("/{}", i);
        prop_assert!(apply(&mut target, &[Operation::replace(path, json!(value))]).succeeded);
        prop_assert_eq!(target.len(), items.len());
        for (j, (after, before)) in target.iter().zip(&items).enumerate() {
            if j == i {
                prop_assert_eq!(*after, value);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }

    /// Moving within one collection is a remove followed by an add. Moving an
    /// element onto itself is rejected.
    #[test]
    fn prop_move_is_remove_then_add((items, from) in non_empty_and_index(), to in 0usize..16) {
        let to = to % items.len();
        prop_assume!(to != from);
        let mut target = items.clone();
        let result = apply(&mut target, &[Operation::move_from(format!("/{from}"), format!("/{to}"))]);
        prop_assert!(result.succeeded);

        let mut expected = items;
        let value = expected.remove(from);
        expected.insert(to, value);
        prop_assert_eq!(target, expected);
    }
}

#[test]
fn move_onto_itself_is_rejected() {
    let mut target = vec![1, 2, 3];
    let result = apply(&mut target, &[Operation::move_from("/1", "/1")]);
    assert_eq!(result.failure_reason, Some(FailureReason::OperationFailed));
    assert_eq!(target, [1, 2, 3]);
}
