//! Integration tests for SortedKeyedSet and SortedSet.

#![cfg(feature = "keyed")]

use lazysorted::{DuplicatePolicy, SortedKeyedSet, SortedListError, SortedSet};
use rstest::rstest;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
struct Record {
    id: u32,
    label: &'static str,
}

fn record(id: u32, label: &'static str) -> Record {
    Record { id, label }
}

fn by_id(record: &Record) -> u32 {
    record.id
}

type Records = SortedKeyedSet<Record, fn(&Record) -> u32>;

fn records(policy: DuplicatePolicy) -> Records {
    Records::with_key(by_id).with_policy(policy)
}

// =============================================================================
// Duplicate policies
// =============================================================================

#[rstest]
fn test_keep_new_replaces_same_key() {
    let mut set = records(DuplicatePolicy::KeepNew);
    set.add(record(5, "old")).unwrap();
    set.add(record(5, "new")).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.get_by_key(&5), Some(&record(5, "new")));
}

#[rstest]
#[case(DuplicatePolicy::Fail, Err(()))]
#[case(DuplicatePolicy::KeepOld, Ok(false))]
#[case(DuplicatePolicy::KeepNew, Ok(true))]
#[case(DuplicatePolicy::RequireSameValue, Err(()))]
#[case(DuplicatePolicy::RequireSameIdentity, Err(()))]
fn test_policy_outcome_for_differing_value(
    #[case] policy: DuplicatePolicy,
    #[case] expected: Result<bool, ()>,
) {
    let mut set = records(policy);
    set.add(record(1, "first")).unwrap();
    let outcome = set.add(record(1, "second")).map_err(|error| {
        assert!(matches!(error, SortedListError::DuplicateKeyViolation { .. }));
    });
    assert_eq!(outcome, expected);
}

#[rstest]
fn test_violation_leaves_set_unchanged() {
    let mut set = records(DuplicatePolicy::Fail);
    set.merge([record(1, "a"), record(3, "c")]).unwrap();
    assert!(set.add(record(3, "z")).is_err());
    assert_eq!(set.to_vec(), vec![record(1, "a"), record(3, "c")]);
}

#[rstest]
fn test_policy_tag_round_trip_through_set() {
    let mut set = records(DuplicatePolicy::KeepNew);
    set.set_policy_tag("Old").unwrap();
    assert_eq!(set.policy(), &DuplicatePolicy::KeepOld);
    assert_eq!(set.policy().to_string(), "old");
}

#[rstest]
fn test_invalid_tag_reports_configuration_error() {
    let reported = Rc::new(Cell::new(0));
    let counter = Rc::clone(&reported);
    let mut set = records(DuplicatePolicy::KeepNew)
        .with_error_sink(move |_: &SortedListError| counter.set(counter.get() + 1));

    assert!(set.set_policy_tag("sometimes").is_err());
    assert!(set.add(record(1, "a")).is_err());
    assert!(set.is_empty());
    assert_eq!(reported.get(), 2);
}

#[rstest]
fn test_from_iter_with_stops_at_first_violation() {
    let result = Records::from_iter_with(
        [record(2, "b"), record(2, "c")],
        by_id,
        DuplicatePolicy::RequireSameValue,
    );
    assert!(matches!(
        result,
        Err(SortedListError::DuplicateKeyViolation { ref key }) if key == "2"
    ));
}

// =============================================================================
// Shared handles
// =============================================================================

#[rstest]
fn test_same_identity_accepts_the_stored_handle() {
    let mut set = SortedKeyedSet::new_shared(|entry: &Rc<Record>| entry.id)
        .with_policy(DuplicatePolicy::RequireSameIdentity);
    let stored = Rc::new(record(4, "shared"));

    assert_eq!(set.add(Rc::clone(&stored)), Ok(true));
    assert_eq!(set.add(Rc::clone(&stored)), Ok(false));
    assert!(set.add(Rc::new(record(4, "shared"))).is_err());
    assert_eq!(Rc::strong_count(&stored), 2);
}

// =============================================================================
// SortedSet
// =============================================================================

#[rstest]
fn test_sorted_set_ignores_duplicates() {
    let mut set = SortedSet::new();
    assert_eq!(set.merge([4, 2, 4, 9, 2]), Ok(3));
    assert_eq!(set.to_vec(), vec![2, 4, 9]);
}

#[rstest]
fn test_sorted_set_failing_on_duplicate() {
    let mut set = SortedSet::failing_on_duplicate();
    set.add("a").unwrap();
    assert_eq!(
        set.add("a"),
        Err(SortedListError::DuplicateKeyViolation {
            key: "\"a\"".to_string()
        })
    );
    assert_eq!(set.len(), 1);
}

#[rstest]
fn test_sorted_set_removal() {
    let mut set: SortedSet<i32> = (1..=5).collect();
    assert_eq!(set.remove(&3), Ok(3));
    assert!(set.remove(&3).is_err());
    assert_eq!(set.discard(&3), None);
    assert_eq!(set.clear(), 4);
}
