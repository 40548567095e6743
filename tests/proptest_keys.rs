//! Property-based tests for composite key equality and hashing.
//!
//! The cache contract hinges on two laws: content-equal keys collide
//! (equal and same hash) regardless of buffer identity, and any
//! difference in definition, elements, order, or length separates keys.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use introcache::key::{sequence_eq, sequence_hash_value, GenericMethodKey, GenericTypeKey};
use introcache::meta::{MethodHandle, TypeHandle};
use proptest::prelude::*;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// Strategy for small handle lists (arities above 8 are rare in practice).
fn handles() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..64, 0..8)
}

fn to_types(ids: &[u32]) -> Vec<TypeHandle> {
    ids.iter().map(|&id| TypeHandle(id)).collect()
}

proptest! {
    #[test]
    fn prop_content_equal_keys_are_equal_and_hash_equal(def in 0u32..16, ids in handles()) {
        let first_buffer = to_types(&ids);
        let second_buffer = to_types(&ids);
        let a = GenericTypeKey::new(TypeHandle(def), &first_buffer);
        let b = GenericTypeKey::new(TypeHandle(def), &second_buffer);

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn prop_different_definitions_never_collide(
        def_a in 0u32..16,
        def_b in 16u32..32,
        ids in handles(),
    ) {
        let args = to_types(&ids);
        let a = GenericTypeKey::new(TypeHandle(def_a), &args);
        let b = GenericTypeKey::new(TypeHandle(def_b), &args);
        prop_assert_ne!(a, b);
    }

    #[test]
    fn prop_appending_an_argument_changes_the_key(def in 0u32..16, ids in handles(), extra in 0u32..64) {
        let short = to_types(&ids);
        let mut long = short.clone();
        long.push(TypeHandle(extra));

        let a = GenericTypeKey::new(TypeHandle(def), &short);
        let b = GenericTypeKey::new(TypeHandle(def), &long);
        prop_assert_ne!(a, b);
    }

    #[test]
    fn prop_swapping_adjacent_distinct_elements_changes_the_key(
        def in 0u32..16,
        ids in prop::collection::vec(0u32..64, 2..8),
        at in 0usize..6,
    ) {
        let at = at % (ids.len() - 1);
        prop_assume!(ids[at] != ids[at + 1]);

        let original = to_types(&ids);
        let mut swapped = original.clone();
        swapped.swap(at, at + 1);

        let a = GenericTypeKey::new(TypeHandle(def), &original);
        let b = GenericTypeKey::new(TypeHandle(def), &swapped);
        prop_assert_ne!(a, b);
    }

    #[test]
    fn prop_method_keys_follow_the_same_laws(def in 0u32..16, ids in handles()) {
        let args = to_types(&ids);
        let a = GenericMethodKey::new(MethodHandle(def), &args);
        let b = GenericMethodKey::new(MethodHandle(def), &args);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn prop_sequence_eq_matches_slice_equality(xs in handles(), ys in handles()) {
        let a = to_types(&xs);
        let b = to_types(&ys);
        prop_assert_eq!(
            sequence_eq(Some(&a[..]), Some(&b[..])),
            a == b
        );
    }

    #[test]
    fn prop_equal_sequences_hash_equal(xs in handles()) {
        let a = to_types(&xs);
        let b = to_types(&xs);
        prop_assert_eq!(
            sequence_hash_value(Some(&a[..])),
            sequence_hash_value(Some(&b[..]))
        );
    }
}
