//! Generational arena behaviour relied on by the dock tree.
//!
//! Handles must stay valid across unrelated removals, and handles to removed
//! values must never resolve again, even after their slot is reused.

use astrelis_core::alloc::sparse_set::{IndexSlot, SparseSet};

#[test]
fn test_push_and_get() {
    let mut set = SparseSet::new();

    let a = set.push("split");
    let b = set.push("tabs");

    assert_eq!(*set.get(a), "split");
    assert_eq!(*set.get(b), "tabs");
    assert_eq!(set.len(), 2);
}

#[test]
fn test_get_mut_updates_in_place() {
    let mut set = SparseSet::new();
    let idx = set.push(vec![1, 2]);

    set.get_mut(idx).push(3);

    assert_eq!(set.get(idx), &vec![1, 2, 3]);
}

#[test]
fn test_try_get_invalid_returns_none() {
    let set = SparseSet::<i32>::new();
    assert_eq!(set.try_get(IndexSlot::new(0, 999)), None);
}

#[test]
#[should_panic(expected = "invalid generation")]
fn test_use_after_free_panics() {
    let mut set = SparseSet::new();
    let idx = set.push(42);
    set.remove(idx);
    let _ = set.get(idx);
}

#[test]
fn test_slot_reuse_bumps_generation() {
    let mut set = SparseSet::new();

    let first = set.push(1);
    let second = set.push(2);
    set.remove(first);
    let third = set.push(3);

    assert_eq!(third.index(), first.index());
    assert_eq!(third.generation(), first.generation() + 1);
    assert_eq!(set.try_get(first), None);
    assert_eq!(*set.get(second), 2);
    assert_eq!(*set.get(third), 3);
}

#[test]
fn test_try_remove_is_idempotent() {
    let mut set = SparseSet::new();
    let idx = set.push(7);

    assert_eq!(set.try_remove(idx), Some(7));
    assert_eq!(set.try_remove(idx), None);
    assert!(set.is_empty());
}

#[test]
fn test_clear_invalidates_all_handles() {
    let mut set = SparseSet::new();
    let handles: Vec<_> = (0..4).map(|i| set.push(i)).collect();

    set.clear();

    assert!(set.is_empty());
    assert!(handles.iter().all(|&h| !set.contains(h)));
    let fresh = set.push(10);
    assert_eq!(*set.get(fresh), 10);
}

#[test]
fn test_iteration_skips_removed() {
    let mut set = SparseSet::new();
    set.push(10);
    let middle = set.push(20);
    set.push(30);
    set.remove(middle);

    let values: Vec<_> = set.iter().copied().collect();
    assert_eq!(values, vec![10, 30]);

    for value in set.iter_mut() {
        *value += 1;
    }
    let slots: Vec<_> = set.iter_slots().map(|(_, v)| *v).collect();
    assert_eq!(slots, vec![11, 31]);
}

#[test]
fn test_many_removals_and_reuses() {
    let mut set = SparseSet::new();
    let handles: Vec<_> = (0..100).map(|i| set.push(i)).collect();

    for h in handles.iter().step_by(2) {
        set.remove(*h);
    }
    assert_eq!(set.len(), 50);

    for i in 100..150 {
        set.push(i);
    }
    assert_eq!(set.len(), 100);
    assert!(handles.iter().skip(1).step_by(2).all(|&h| set.contains(h)));
}
