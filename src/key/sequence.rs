//! Order-sensitive equality and hashing for optional sequences.
//!
//! Composite cache keys embed ordered argument lists. Correct caching
//! needs content equality over those lists: two reference-distinct
//! buffers with the same elements in the same order must produce the same
//! key. These helpers are the single primitive every composite key type
//! routes its sequence fields through.
//!
//! An absent sequence and an empty one are distinct for equality but
//! share the seed hash; hash collisions between the two are acceptable.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Seed folded into every sequence hash before the elements.
///
/// Ensures an empty sequence field still perturbs the enclosing key's
/// hash instead of vanishing.
const SEQUENCE_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Order-sensitive equality over optional sequences.
///
/// Returns true iff both are absent, or both are present with the same
/// length and pairwise-equal elements in order.
///
/// # Examples
///
/// ```
/// use introcache::key::sequence_eq;
///
/// let a = vec![1, 2, 3];
/// let b = vec![1, 2, 3];
/// assert!(sequence_eq(Some(&a[..]), Some(&b[..])));
/// assert!(!sequence_eq(Some(&a[..]), Some(&b[..2])));
/// assert!(!sequence_eq(Some(&a[..]), None));
/// assert!(sequence_eq::<i32>(None, None));
/// ```
pub fn sequence_eq<T: PartialEq>(a: Option<&[T]>, b: Option<&[T]>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y),
        _ => false,
    }
}

/// Fold an optional sequence into a hasher, element by element, in order.
///
/// Absent and empty sequences both reduce to the seed alone. Element
/// position matters: `[a, b]` and `[b, a]` feed the hasher differently.
pub fn sequence_hash<T: Hash, H: Hasher>(sequence: Option<&[T]>, state: &mut H) {
    SEQUENCE_SEED.hash(state);
    if let Some(elements) = sequence {
        for element in elements {
            element.hash(state);
        }
    }
}

/// One-shot sequence hash using [`FxHasher`].
///
/// Convenience for callers that want a standalone `u64` digest rather
/// than folding into an enclosing key hash.
pub fn sequence_hash_value<T: Hash>(sequence: Option<&[T]>) -> u64 {
    let mut hasher = FxHasher::default();
    sequence_hash(sequence, &mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_content_distinct_buffers() {
        let a: Vec<u32> = vec![10, 20, 30];
        let b: Vec<u32> = vec![10, 20, 30];
        assert!(sequence_eq(Some(&a[..]), Some(&b[..])));
        assert_eq!(
            sequence_hash_value(Some(&a[..])),
            sequence_hash_value(Some(&b[..]))
        );
    }

    #[test]
    fn test_order_sensitivity() {
        let a = [1u32, 2];
        let b = [2u32, 1];
        assert!(!sequence_eq(Some(&a[..]), Some(&b[..])));
        assert_ne!(
            sequence_hash_value(Some(&a[..])),
            sequence_hash_value(Some(&b[..]))
        );
    }

    #[test]
    fn test_length_sensitivity() {
        let a = [1u32, 2, 3];
        assert!(!sequence_eq(Some(&a[..]), Some(&a[..2])));
    }

    #[test]
    fn test_absent_and_empty_are_unequal() {
        let empty: [u32; 0] = [];
        assert!(!sequence_eq(None, Some(&empty[..])));
        assert!(sequence_eq::<u32>(None, None));
        // Hashes may collide by contract; both reduce to the seed.
        assert_eq!(
            sequence_hash_value::<u32>(None),
            sequence_hash_value(Some(&empty[..]))
        );
    }

    #[test]
    fn test_empty_hash_is_deterministic() {
        assert_eq!(
            sequence_hash_value::<u32>(None),
            sequence_hash_value::<u32>(None)
        );
    }
}
