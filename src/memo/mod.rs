//! Generic memoization engine.
//!
//! [`MemoCache`] is an unbounded concurrent key/value store with explicit
//! whole-cache invalidation; [`Memoized`] pairs one pure fallible
//! function with a private cache and exposes the same call signature plus
//! `clear()`.
//!
//! # Purity requirement
//!
//! Wrapped functions must be pure queries: referentially stable for the
//! process lifetime and free of externally visible side effects. There is
//! no single-flight coalescing, so concurrent first calls on the same
//! uncomputed key may each invoke the function; the duplicated work is
//! acceptable precisely because the function is pure. Whichever insert
//! finishes last wins.
//!
//! # Thread safety
//!
//! Storage is a [`DashMap`], internally synchronized for concurrent read
//! and insert; one instance can be shared across threads without external
//! locking. `clear()` is not a barrier: a call racing with it may return
//! a pre-clear value or recompute, and either outcome is correct.
//!
//! # Example
//!
//! ```
//! use introcache::memo::Memoized;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let calls = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&calls);
//! let squares: Memoized<u32, u64, std::convert::Infallible> =
//!     Memoized::new(move |n| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!         Ok(u64::from(*n) * u64::from(*n))
//!     });
//!
//! assert_eq!(squares.call(&12), Ok(144));
//! assert_eq!(squares.call(&12), Ok(144));
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//!
//! squares.clear();
//! assert_eq!(squares.call(&12), Ok(144));
//! assert_eq!(calls.load(Ordering::SeqCst), 2);
//! ```

use std::hash::Hash;

use dashmap::DashMap;

use crate::error::IntrospectError;

/// Unbounded concurrent cache with explicit whole-cache invalidation.
///
/// Owned by exactly one memoized operation. There is no eviction policy;
/// entries live until [`MemoCache::clear`] or until the cache is dropped.
pub struct MemoCache<K, V> {
    entries: DashMap<K, V>,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Look up a stored value, cloning it out of the map.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Store a value, replacing any previous entry for the key.
    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Return the stored value for `key`, or run `compute` and store its
    /// result.
    ///
    /// The computation runs outside any map lock, so it may re-enter this
    /// or other caches freely. A failed computation stores nothing; the
    /// error is returned unchanged and a later call with an equal key
    /// re-attempts it. Concurrent misses on the same key may each run
    /// `compute`; the last insert wins.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(stored) = self.get(key) {
            return Ok(stored);
        }
        let value = compute()?;
        self.entries.insert(key.clone(), value.clone());
        Ok(value)
    }

    /// Empty the cache. Subsequent lookups repopulate lazily.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visit every stored value.
    ///
    /// Used by owners whose cached values are themselves cache holders
    /// and need transitive invalidation.
    pub fn for_each_value(&self, mut visit: impl FnMut(&V)) {
        for entry in self.entries.iter() {
            visit(entry.value());
        }
    }
}

impl<K, V> Default for MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for MemoCache<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// A pure fallible function paired with its private cache.
///
/// Calling with a key equal to one already computed returns the stored
/// result without invoking the function. The error type defaults to
/// [`IntrospectError`]; the engine itself is domain-independent.
pub struct Memoized<K, V, E = IntrospectError> {
    compute: Box<dyn Fn(&K) -> Result<V, E> + Send + Sync>,
    cache: MemoCache<K, V>,
}

impl<K, V, E> Memoized<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Wrap a pure function.
    ///
    /// The function must be referentially stable: equal keys must produce
    /// interchangeable results for the lifetime of this value.
    pub fn new(compute: impl Fn(&K) -> Result<V, E> + Send + Sync + 'static) -> Self {
        Self {
            compute: Box::new(compute),
            cache: MemoCache::new(),
        }
    }

    /// Invoke the memoized operation.
    ///
    /// Hit: returns the stored result without invoking the function.
    /// Miss: invokes the function, stores the result on success only, and
    /// returns it. Errors propagate unchanged and are never cached.
    pub fn call(&self, key: &K) -> Result<V, E> {
        self.cache
            .get_or_try_insert_with(key, || (self.compute)(key))
    }

    /// Empty the private cache; the wrapping stays armed and repopulates
    /// lazily on subsequent calls.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no results are cached.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Visit every cached result.
    pub fn for_each_value(&self, visit: impl FnMut(&V)) {
        self.cache.for_each_value(visit);
    }
}

impl<K, V, E> std::fmt::Debug for Memoized<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("cached", &self.cache.len())
            .finish()
    }
}
