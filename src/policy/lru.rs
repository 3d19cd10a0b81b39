//! # Bounded LRU Cache
//!
//! Fixed-capacity map that evicts the least recently used entry.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                    BoundedLruCache<K, V>  (Clone = shared handle)        │
//!   │                                                                          │
//!   │                    Arc<parking_lot::RwLock<LruCore<K, V>>>               │
//!   │                                                                          │
//!   │   ┌──────────────────────────────────────────────────────────────────┐   │
//!   │   │  LruCore<K, V>                                                   │   │
//!   │   │                                                                  │   │
//!   │   │   map: FxHashMap<K, SlotId>        list: IntrusiveList<Entry>    │   │
//!   │   │   ┌──────┬────────┐                                              │   │
//!   │   │   │ key  │ SlotId │──────────┐     head (MRU)         tail (LRU) │   │
//!   │   │   ├──────┼────────┤          │       │                    │     │   │
//!   │   │   │  3   │ id_2   │          └─────► [3,c] ◄─► [1,a] ◄─► [2,b]  │   │
//!   │   │   │  1   │ id_0   │                                              │   │
//!   │   │   │  2   │ id_1   │                                              │   │
//!   │   │   └──────┴────────┘                                              │   │
//!   │   └──────────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The map stores `SlotId` handles into the list's arena rather than pointers.
//! A handle is removed from the map in the same call that frees its slot, so
//! the map never points at a reused slot.
//!
//! ## Operations
//!
//! | Operation   | Lock      | Effect                                     | Complexity |
//! |-------------|-----------|--------------------------------------------|------------|
//! | `set`       | exclusive | overwrite + promote, or evict tail + push  | O(1)       |
//! | `get`       | exclusive | clone value + promote                      | O(1)       |
//! | `peek`      | shared    | clone value, order untouched               | O(1)       |
//! | `contains`  | shared    | membership                                 | O(1)       |
//! | `remove`    | exclusive | unlink entry                               | O(1)       |
//! | `pop_lru`   | exclusive | remove tail                                | O(1)       |
//! | `clear`     | exclusive | drop everything                            | O(n)       |
//!
//! ## Locking
//!
//! `get` reorders the list, so it takes the write lock for lookup and promotion
//! together. There is no window in which another writer could evict the key
//! between finding it and promoting it.
//!
//! ## Example Usage
//!
//! ```
//! use boundkit::policy::lru::BoundedLruCache;
//!
//! let cache = BoundedLruCache::new(2).unwrap();
//! cache.set(1, "one");
//! cache.set(2, "two");
//! cache.get(&1);           // 1 becomes most recent
//! cache.set(3, "three");   // evicts 2
//!
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&1), Some("one"));
//! assert_eq!(cache.get(&3), Some("three"));
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::CacheMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::CacheMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::policy::MAX_PREALLOCATED_ENTRIES;
use crate::traits::{CoreCache, LruCacheTrait, MutableCache, SharedCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Unsynchronized LRU cache: hash map of `SlotId`s into a recency list.
///
/// All methods assume exclusive access through `&mut self` or a shared
/// borrow; wrap in [`BoundedLruCache`] for use across threads.
pub struct LruCore<K, V>
where
    K: Eq + Hash,
{
    map: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Fails with [`ConfigError`] when `capacity` is zero.
    ///
    /// # Example
    /// ```
    /// use boundkit::policy::lru::LruCore;
    ///
    /// let cache: LruCore<u32, String> = LruCore::new(100).unwrap();
    /// assert!(LruCore::<u32, String>::new(0).is_err());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        ConfigError::check_capacity(capacity)?;
        let reserved = capacity.min(MAX_PREALLOCATED_ENTRIES);
        Ok(LruCore {
            map: FxHashMap::with_capacity_and_hasher(reserved, Default::default()),
            list: IntrusiveList::with_capacity(reserved),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        })
    }

    /// Returns the value for `key` without changing recency.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.map.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Unlinks the tail entry and drops its map handle.
    fn pop_tail(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.map.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Evicts the least recently used entry to make room for an insert.
    fn evict_one(&mut self) -> Option<(K, V)> {
        let evicted = self.pop_tail()?;
        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();
        tracing::trace!(
            policy = "lru",
            capacity = self.capacity,
            len = self.map.len(),
            "evicted least recently used entry"
        );
        Some(evicted)
    }

    /// Checks that the map and the recency list describe the same entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_links()?;
        if self.map.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "map holds {} keys, recency list holds {} entries",
                self.map.len(),
                self.list.len()
            )));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.map {
            match self.list.get(id) {
                Some(entry) if entry.key == *key => {},
                _ => return Err(InvariantError::new("map handle points at the wrong entry")),
            }
        }
        Ok(())
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.map.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let previous = self
                .list
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.list.move_to_front(id);
            return previous;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.map.len() >= self.capacity {
            self.evict_one();
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.map.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.map.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.list.clear();
        self.map.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.map.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        self.pop_tail()
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.map.len(), self.capacity)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Thread-safe bounded LRU cache.
///
/// A cheap-to-clone handle over `Arc<RwLock<LruCore>>`. Values are handed
/// out as clones.
pub struct BoundedLruCache<K, V>
where
    K: Eq + Hash,
{
    inner: Arc<RwLock<LruCore<K, V>>>,
}

impl<K, V> Clone for BoundedLruCache<K, V>
where
    K: Eq + Hash,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for BoundedLruCache<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("BoundedLruCache")
            .field("len", &cache.map.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> BoundedLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries; zero is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use boundkit::policy::lru::BoundedLruCache;
    ///
    /// let cache: BoundedLruCache<u32, String> = BoundedLruCache::new(100).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        LruCore::new(capacity).map(|core| Self {
            inner: Arc::new(RwLock::new(core)),
        })
    }

    /// Inserts or overwrites `key` and marks it most recently used.
    ///
    /// Returns the previous value when the key already existed. A new key in
    /// a full cache evicts the least recently used entry first.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        let mut cache = self.inner.write();
        cache.insert(key, value)
    }

    /// Returns a clone of the value and marks the key most recently used.
    ///
    /// Takes the write lock: lookup and promotion are one critical section.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.write();
        cache.get(key).cloned()
    }

    /// Returns a clone of the value without changing recency.
    ///
    /// # Example
    ///
    /// ```
    /// use boundkit::policy::lru::BoundedLruCache;
    ///
    /// let cache = BoundedLruCache::new(2).unwrap();
    /// cache.set(1, "first");
    /// cache.set(2, "second");
    /// assert_eq!(cache.peek(&1), Some("first"));
    ///
    /// cache.set(3, "third"); // 1 is still least recent
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<V> {
        let cache = self.inner.read();
        cache.peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.read();
        cache.contains(key)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.write();
        cache.remove(key)
    }

    pub fn len(&self) -> usize {
        let cache = self.inner.read();
        cache.len()
    }

    pub fn is_empty(&self) -> bool {
        let cache = self.inner.read();
        cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        let cache = self.inner.read();
        cache.capacity()
    }

    pub fn clear(&self) {
        let mut cache = self.inner.write();
        cache.clear();
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, V)> {
        let mut cache = self.inner.write();
        cache.pop_lru()
    }

    /// Returns a clone of the least recently used entry.
    pub fn peek_lru(&self) -> Option<(K, V)> {
        let cache = self.inner.read();
        cache.peek_lru().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Returns keys ordered from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        let cache = self.inner.read();
        cache.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let cache = self.inner.read();
        cache.check_invariants()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> BoundedLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        let cache = self.inner.read();
        cache.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for BoundedLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> SharedCache<K, V> for BoundedLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn set(&self, key: K, value: V) -> Option<V> {
        BoundedLruCache::set(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        BoundedLruCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        BoundedLruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        BoundedLruCache::len(self)
    }

    fn is_empty(&self) -> bool {
        BoundedLruCache::is_empty(self)
    }

    fn capacity(&self) -> usize {
        BoundedLruCache::capacity(self)
    }

    fn clear(&self) {
        BoundedLruCache::clear(self)
    }
}
