//! # Cache Trait Hierarchy
//!
//! Two layers, matching the two layers of every cache in this crate:
//!
//! ```text
//!   Unsynchronized cores (&mut self)             Thread-safe handles (&self)
//!   ════════════════════════════════             ═══════════════════════════
//!
//!   ┌──────────────────────────────┐             ┌──────────────────────────────┐
//!   │       CoreCache<K, V>        │             │      SharedCache<K, V>       │
//!   │                              │             │      : Send + Sync           │
//!   │  insert(K, V) → Option<V>    │             │                              │
//!   │  get(&K) → Option<&V>        │             │  set(K, V) → Option<V>       │
//!   │  contains(&K) → bool         │             │  get(&K) → Option<V>         │
//!   │  len / is_empty / capacity   │             │  contains(&K) → bool         │
//!   │  clear()                     │             │  len / is_empty / capacity   │
//!   └──────────────┬───────────────┘             │  clear()                     │
//!                  │                             └──────────────┬───────────────┘
//!                  ▼                                            │
//!   ┌──────────────────────────────┐                            │
//!   │     MutableCache<K, V>       │                            │
//!   │  remove(&K) → Option<V>      │                            │
//!   └──────┬────────────────┬──────┘                            │
//!          ▼                ▼                                   ▼
//!   ┌─────────────┐  ┌─────────────┐             ┌─────────────────────────────┐
//!   │LruCacheTrait│  │LfuCacheTrait│             │ BoundedLruCache             │
//!   │ pop_lru     │  │ pop_lfu     │             │ BoundedLfuCache             │
//!   │ peek_lru    │  │ peek_lfu    │             │ builder::Cache (either)     │
//!   └─────────────┘  │ frequency   │             └─────────────────────────────┘
//!                    └─────────────┘
//! ```
//!
//! `SharedCache` is the capability callers code against when the eviction
//! policy should be substitutable: both bounded caches implement it as
//! alternative variants, and [`builder::Cache`](crate::builder::Cache) picks
//! one at runtime.
//!
//! ## `get` is a write
//!
//! On both layers `get` updates eviction state (recency or frequency). The
//! thread-safe handles therefore take the exclusive lock for `get`, covering
//! lookup and reposition in one critical section. Use `contains` (or the
//! caches' inherent `peek`) for a shared-lock read that leaves eviction order
//! alone.
//!
//! ## Example Usage
//!
//! ```
//! use boundkit::policy::lfu::BoundedLfuCache;
//! use boundkit::policy::lru::BoundedLruCache;
//! use boundkit::traits::SharedCache;
//!
//! fn warm<C: SharedCache<u64, String>>(cache: &C, data: &[(u64, &str)]) {
//!     for (key, value) in data {
//!         cache.set(*key, value.to_string());
//!     }
//! }
//!
//! let lru = BoundedLruCache::new(8).unwrap();
//! let lfu = BoundedLfuCache::new(8).unwrap();
//! warm(&lru, &[(1, "one"), (2, "two")]);
//! warm(&lfu, &[(1, "one"), (2, "two")]);
//! assert_eq!(lru.len(), 2);
//! assert_eq!(SharedCache::get(&lfu, &2), Some("two".to_string()));
//! ```

/// Core operations of an unsynchronized cache.
///
/// # Example
///
/// ```
/// use boundkit::policy::lru::LruCore;
/// use boundkit::traits::CoreCache;
///
/// let mut cache = LruCore::new(2).unwrap();
/// assert_eq!(cache.insert(1, "first"), None);
/// assert_eq!(cache.insert(1, "second"), Some("first"));
/// assert_eq!(cache.get(&1), Some(&"second"));
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key existed.
    ///
    /// Inserting a new key into a full cache evicts one entry first,
    /// according to the cache's policy.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value, updating eviction state.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating eviction state.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&mut self);
}

/// Caches that support removal of an arbitrary key.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;
}

/// Recency-ordered caches.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without touching it.
    fn peek_lru(&self) -> Option<(&K, &V)>;
}

/// Frequency-ordered caches.
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the entry that would be evicted next.
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// Returns the entry that would be evicted next without touching it.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Returns the access counter of `key`.
    fn frequency(&self, key: &K) -> Option<u64>;
}

/// Thread-safe bounded cache shared between threads by reference.
///
/// Values are returned as clones; no reference into the cache outlives the
/// internal lock.
pub trait SharedCache<K, V>: Send + Sync {
    /// Inserts or overwrites `key`, returning the previous value.
    ///
    /// Always succeeds; a new key in a full cache evicts one entry first.
    fn set(&self, key: K, value: V) -> Option<V>;

    /// Returns a clone of the value and records the access.
    fn get(&self, key: &K) -> Option<V>;

    /// Checks for `key` under the shared lock without recording an access.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&self);
}
