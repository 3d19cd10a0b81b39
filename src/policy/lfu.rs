//! # Bounded LFU Cache
//!
//! Fixed-capacity map that evicts the entry with the smallest access counter,
//! breaking ties by the smallest key.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                    BoundedLfuCache<K, V>  (Clone = shared handle)        │
//!   │                                                                          │
//!   │                    Arc<parking_lot::RwLock<LfuCore<K, V>>>               │
//!   │                                                                          │
//!   │   entries: FxHashMap<K, Entry>          order: BTreeSet<(u64, K)>        │
//!   │   ┌──────┬─────────────────────┐        ┌──────────────────────────┐     │
//!   │   │ key  │ Entry               │        │ (1, "b")  ◄── next victim│     │
//!   │   ├──────┼─────────────────────┤        │ (1, "d")                 │     │
//!   │   │ "a"  │ { value, freq: 3 }  │        │ (3, "a")                 │     │
//!   │   │ "b"  │ { value, freq: 1 }  │        │ (7, "c")                 │     │
//!   │   │ "c"  │ { value, freq: 7 }  │        └──────────────────────────┘     │
//!   │   │ "d"  │ { value, freq: 1 }  │                                         │
//!   │   └──────┴─────────────────────┘                                         │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every key appears exactly once in `order`, paired with the counter stored
//! in its `Entry`. The set is ordered by `(counter, key)`, so its first
//! element is the eviction victim and ties fall to the smaller key.
//!
//! ## Counters
//!
//! A new key starts at 1. Each `get` hit and each overwriting `set` adds 1,
//! saturating at `u64::MAX`. `peek`, `contains` and `frequency` never count.
//!
//! ## Operations
//!
//! | Operation   | Lock      | Effect                                   | Complexity |
//! |-------------|-----------|------------------------------------------|------------|
//! | `set`       | exclusive | overwrite + bump, or evict min + insert  | O(log n)   |
//! | `get`       | exclusive | clone value + bump                       | O(log n)   |
//! | `peek`      | shared    | clone value                              | O(1)       |
//! | `remove`    | exclusive | drop entry + order slot                  | O(log n)   |
//! | `pop_lfu`   | exclusive | remove the next victim                   | O(log n)   |
//! | `frequency` | shared    | read counter                             | O(1)       |
//!
//! ## Example Usage
//!
//! ```
//! use boundkit::policy::lfu::BoundedLfuCache;
//!
//! let cache = BoundedLfuCache::new(2).unwrap();
//! cache.set(1, "one");
//! cache.set(2, "two");
//! cache.set(3, "three"); // 1 and 2 tie at one access; 1 is smaller
//!
//! assert_eq!(cache.get(&1), None);
//! assert_eq!(cache.get(&2), Some("two"));
//! assert_eq!(cache.get(&3), Some("three"));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::CacheMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::CacheMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::policy::MAX_PREALLOCATED_ENTRIES;
use crate::traits::{CoreCache, LfuCacheTrait, MutableCache, SharedCache};

#[derive(Debug)]
struct Entry<V> {
    value: V,
    frequency: u64,
}

/// Unsynchronized LFU cache ordered by `(counter, key)`.
pub struct LfuCore<K, V>
where
    K: Eq + Hash + Ord,
{
    entries: FxHashMap<K, Entry<V>>,
    order: BTreeSet<(u64, K)>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Fails with [`ConfigError`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        ConfigError::check_capacity(capacity)?;
        Ok(LfuCore {
            entries: FxHashMap::with_capacity_and_hasher(
                capacity.min(MAX_PREALLOCATED_ENTRIES),
                Default::default(),
            ),
            order: BTreeSet::new(),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        })
    }

    /// Returns the value for `key` without counting an access.
    #[inline]
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Adds one access to `key` and moves it within `order`.
    fn bump(&mut self, key: &K) -> Option<&mut Entry<V>> {
        let entry = self.entries.get_mut(key)?;
        let old = entry.frequency;
        entry.frequency = old.saturating_add(1);
        if entry.frequency != old {
            let mut slot = (old, key.clone());
            self.order.remove(&slot);
            slot.0 = entry.frequency;
            self.order.insert(slot);
        }
        Some(entry)
    }

    fn pop_min(&mut self) -> Option<(K, V)> {
        let (_, key) = self.order.pop_first()?;
        let entry = self.entries.remove(&key)?;
        Some((key, entry.value))
    }

    fn evict_one(&mut self) -> Option<(K, V)> {
        let evicted = self.pop_min()?;
        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();
        tracing::trace!(
            policy = "lfu",
            capacity = self.capacity,
            len = self.entries.len(),
            "evicted least frequently used entry"
        );
        Some(evicted)
    }

    /// Returns `(key, counter)` pairs in eviction order.
    pub fn iter_by_eviction_order(&self) -> impl Iterator<Item = (&K, u64)> {
        self.order.iter().map(|(frequency, key)| (key, *frequency))
    }

    /// Checks that every entry has exactly one matching slot in the order set.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.entries.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "entries hold {} keys, order set holds {}",
                self.entries.len(),
                self.order.len()
            )));
        }
        if self.entries.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.entries.len(),
                self.capacity
            )));
        }
        for (frequency, key) in &self.order {
            match self.entries.get(key) {
                Some(entry) if entry.frequency == *frequency => {},
                Some(_) => return Err(InvariantError::new("order slot has a stale counter")),
                None => return Err(InvariantError::new("order slot has no entry")),
            }
            if *frequency == 0 {
                return Err(InvariantError::new("counter below 1"));
            }
        }
        Ok(())
    }
}

impl<K, V> CoreCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(entry) = self.bump(&key) {
            let previous = std::mem::replace(&mut entry.value, value);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return Some(previous);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.entries.len() >= self.capacity {
            self.evict_one();
        }

        self.order.insert((1, key.clone()));
        self.entries.insert(
            key,
            Entry {
                value,
                frequency: 1,
            },
        );
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        {
            if self.entries.contains_key(key) {
                self.metrics.record_get_hit();
            } else {
                self.metrics.record_get_miss();
            }
        }

        self.bump(key).map(|entry| &entry.value)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.entries.clear();
        self.order.clear();
    }
}

impl<K, V> MutableCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&(entry.frequency, key.clone()));
        Some(entry.value)
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    fn pop_lfu(&mut self) -> Option<(K, V)> {
        self.pop_min()
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        let (_, key) = self.order.first()?;
        self.entries.get(key).map(|entry| (key, &entry.value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.frequency)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.entries.len(), self.capacity)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for LfuCore<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LfuCore<K, V>
where
    K: Eq + Hash + Ord,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCore")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Thread-safe bounded LFU cache.
///
/// Clones share one underlying cache. Values are handed out as clones.
pub struct BoundedLfuCache<K, V>
where
    K: Eq + Hash + Ord,
{
    inner: Arc<RwLock<LfuCore<K, V>>>,
}

impl<K, V> Clone for BoundedLfuCache<K, V>
where
    K: Eq + Hash + Ord,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for BoundedLfuCache<K, V>
where
    K: Eq + Hash + Ord,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("BoundedLfuCache")
            .field("len", &cache.entries.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> BoundedLfuCache<K, V>
where
    K: Eq + Hash + Ord + Clone,
    V: Clone,
{
    /// Creates a cache holding at most `capacity` entries; zero is rejected.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        LfuCore::new(capacity).map(|core| Self {
            inner: Arc::new(RwLock::new(core)),
        })
    }

    /// Inserts or overwrites `key`.
    ///
    /// Overwriting counts as an access. A new key in a full cache first evicts
    /// the entry with the smallest `(counter, key)`.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        let mut cache = self.inner.write();
        cache.insert(key, value)
    }

    /// Returns a clone of the value and counts the access.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.write();
        cache.get(key).cloned()
    }

    /// Returns a clone of the value without counting an access.
    pub fn peek(&self, key: &K) -> Option<V> {
        let cache = self.inner.read();
        cache.peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.read();
        cache.contains(key)
    }

    /// Returns the access counter of `key`.
    ///
    /// # Example
    ///
    /// ```
    /// use boundkit::policy::lfu::BoundedLfuCache;
    ///
    /// let cache = BoundedLfuCache::new(4).unwrap();
    /// cache.set("page", 1);
    /// cache.get(&"page");
    /// cache.set("page", 2);
    /// assert_eq!(cache.frequency(&"page"), Some(3));
    /// assert_eq!(cache.frequency(&"missing"), None);
    /// ```
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let cache = self.inner.read();
        cache.frequency(key)
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

    /// Removes and returns the entry that would be evicted next.
    pub fn pop_lfu(&self) -> Option<(K, V)> {
        let mut cache = self.inner.write();
        cache.pop_lfu()
    }

    pub fn peek_lfu(&self) -> Option<(K, V)> {
        let cache = self.inner.read();
        cache.peek_lfu().map(|(k, v)| (k.clone(), v.clone()))
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let cache = self.inner.read();
        cache.check_invariants()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> BoundedLfuCache<K, V>
where
    K: Eq + Hash + Ord + Clone,
    V: Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        let cache = self.inner.read();
        cache.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for BoundedLfuCache<K, V>
where
    K: Eq + Hash + Ord + Clone,
    V: Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> SharedCache<K, V> for BoundedLfuCache<K, V>
where
    K: Eq + Hash + Ord + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn set(&self, key: K, value: V) -> Option<V> {
        BoundedLfuCache::set(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        BoundedLfuCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        BoundedLfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        BoundedLfuCache::len(self)
    }

    fn is_empty(&self) -> bool {
        BoundedLfuCache::is_empty(self)
    }

    fn capacity(&self) -> usize {
        BoundedLfuCache::capacity(self)
    }

    fn clear(&self) {
        BoundedLfuCache::clear(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==============================================
    // CORRECTNESS TESTS MODULE
    // ==============================================
    mod correctness {
        use super::*;

        #[test]
        fn test_basic_set_get() {
            let cache = BoundedLfuCache::new(3).unwrap();
            cache.set("a", 1);
            cache.set("b", 2);
            cache.set("c", 3);
            assert_eq!(cache.len(), 3);
            assert_eq!(cache.get(&"a"), Some(1));
            assert_eq!(cache.get(&"b"), Some(2));
            assert_eq!(cache.get(&"c"), Some(3));
            assert_eq!(cache.get(&"d"), None);
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_tie_breaks_on_smallest_key() {
            let cache = BoundedLfuCache::new(2).unwrap();
            cache.set(1, "one");
            cache.set(2, "two");
            cache.set(3, "three");
            assert_eq!(cache.get(&1), None);
            assert_eq!(cache.get(&2), Some("two"));
            assert_eq!(cache.get(&3), Some("three"));
        }

        #[test]
        fn test_tie_break_ignores_insertion_order() {
            let cache = BoundedLfuCache::new(2).unwrap();
            cache.set(5, ());
            cache.set(3, ());
            cache.set(9, ());
            // 5 arrived first but 3 is smaller
            assert!(cache.contains(&5));
            assert!(!cache.contains(&3));
            assert!(cache.contains(&9));
        }

        #[test]
        fn test_frequent_key_survives() {
            let cache = BoundedLfuCache::new(2).unwrap();
            cache.set(1, "one");
            cache.set(2, "two");
            cache.get(&1);
            cache.get(&1);
            cache.get(&2);
            cache.set(3, "three");
            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
            assert!(cache.contains(&3));
        }

        #[test]
        fn test_overwrite_counts_as_access() {
            let cache = BoundedLfuCache::new(2).unwrap();
            cache.set(1, "one");
            cache.set(2, "two");
            assert_eq!(cache.set(1, "uno"), Some("one"));
            assert_eq!(cache.frequency(&1), Some(2));
            cache.set(3, "three");
            assert_eq!(cache.peek(&1), Some("uno"));
            assert!(!cache.contains(&2));
        }

        #[test]
        fn test_peek_and_contains_do_not_count() {
            let cache = BoundedLfuCache::new(2).unwrap();
            cache.set(1, 'a');
            cache.set(2, 'b');
            cache.peek(&1);
            cache.contains(&1);
            assert_eq!(cache.frequency(&1), Some(1));
            cache.set(3, 'c');
            assert!(!cache.contains(&1));
        }

        #[test]
        fn test_remove_then_reinsert_restarts_counter() {
            let cache = BoundedLfuCache::new(3).unwrap();
            cache.set("k", 1);
            cache.get(&"k");
            cache.get(&"k");
            assert_eq!(cache.frequency(&"k"), Some(3));
            assert_eq!(cache.remove(&"k"), Some(1));
            assert_eq!(cache.remove(&"k"), None);
            cache.set("k", 2);
            assert_eq!(cache.frequency(&"k"), Some(1));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_pop_lfu_walks_eviction_order() {
            let cache = BoundedLfuCache::new(4).unwrap();
            cache.set("w", 0);
            cache.set("x", 0);
            cache.set("y", 0);
            cache.set("z", 0);
            cache.get(&"w");
            cache.get(&"w");
            cache.get(&"y");

            assert_eq!(cache.peek_lfu(), Some(("x", 0)));
            let order: Vec<_> = std::iter::from_fn(|| cache.pop_lfu().map(|(k, _)| k)).collect();
            assert_eq!(order, vec!["x", "z", "y", "w"]);
            assert!(cache.is_empty());
        }

        #[test]
        fn test_clear_resets_counters() {
            let cache = BoundedLfuCache::new(2).unwrap();
            cache.set(1, 1);
            cache.get(&1);
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.frequency(&1), None);
            cache.set(1, 1);
            assert_eq!(cache.frequency(&1), Some(1));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_core_iter_by_eviction_order() {
            let mut core = LfuCore::new(3).unwrap();
            core.insert('c', ());
            core.insert('a', ());
            core.insert('b', ());
            core.get(&'a');
            let order: Vec<_> = core.iter_by_eviction_order().collect();
            assert_eq!(order, vec![(&'b', 1), (&'c', 1), (&'a', 2)]);
        }
    }

    // ==============================================
    // EDGE CASES MODULE
    // ==============================================
    mod edge_cases {
        use super::*;

        #[test]
        fn test_zero_capacity_is_rejected() {
            assert!(BoundedLfuCache::<u32, u32>::new(0).is_err());
            assert!(LfuCore::<u32, u32>::new(0).is_err());
        }

        #[test]
        fn test_unbounded_capacity_builds_without_reserving() {
            let cache = BoundedLfuCache::<u64, u64>::new(usize::MAX).unwrap();
            assert_eq!(cache.capacity(), usize::MAX);
            assert_eq!(cache.set(7, 49), None);
            assert_eq!(cache.get(&7), Some(49));
            assert_eq!(cache.frequency(&7), Some(2));
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_capacity_one_replaces_on_every_new_key() {
            let cache = BoundedLfuCache::new(1).unwrap();
            cache.set(1, 1);
            cache.get(&1);
            cache.get(&1);
            // A hot resident still loses to the newcomer: there is no room for both.
            cache.set(2, 2);
            assert_eq!(cache.len(), 1);
            assert!(cache.contains(&2));
        }

        #[test]
        fn test_new_key_can_be_next_victim() {
            let cache = BoundedLfuCache::new(2).unwrap();
            cache.set(1, ());
            cache.set(2, ());
            cache.get(&1);
            cache.get(&2);
            cache.set(3, ());
            cache.set(4, ());
            // 3 entered at 1 access and was the minimum when 4 arrived
            assert!(!cache.contains(&3));
            assert!(cache.contains(&4));
        }

        #[test]
        fn test_string_keys_order_lexicographically() {
            let cache = BoundedLfuCache::new(2).unwrap();
            cache.set("beta".to_string(), 2);
            cache.set("alpha".to_string(), 1);
            cache.set("gamma".to_string(), 3);
            assert!(!cache.contains(&"alpha".to_string()));
        }
    }

    // ==============================================
    // PROPERTY TESTS MODULE
    // ==============================================
    mod property_tests {
        use std::collections::HashMap;

        use proptest::prelude::*;

        use super::*;

        #[derive(Debug, Clone)]
        enum Op {
            Set(u8, u16),
            Get(u8),
            Remove(u8),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..20, any::<u16>()).prop_map(|(k, v)| Op::Set(k, v)),
                (0u8..20).prop_map(Op::Get),
                (0u8..20).prop_map(Op::Remove),
            ]
        }

        fn model_victim(model: &HashMap<u8, (u16, u64)>) -> Option<u8> {
            model
                .iter()
                .min_by_key(|(key, (_, frequency))| (*frequency, **key))
                .map(|(key, _)| *key)
        }

        proptest! {
            #[test]
            fn lfu_matches_counter_model(
                capacity in 1usize..10,
                ops in prop::collection::vec(op_strategy(), 0..300),
            ) {
                let mut core = LfuCore::new(capacity).unwrap();
                let mut model: HashMap<u8, (u16, u64)> = HashMap::new();

                for op in ops {
                    match op {
                        Op::Set(k, v) => {
                            let expected = match model.get_mut(&k) {
                                Some(slot) => {
                                    let old = slot.0;
                                    *slot = (v, slot.1 + 1);
                                    Some(old)
                                },
                                None => {
                                    if model.len() >= capacity {
                                        if let Some(victim) = model_victim(&model) {
                                            model.remove(&victim);
                                        }
                                    }
                                    model.insert(k, (v, 1));
                                    None
                                },
                            };
                            prop_assert_eq!(core.insert(k, v), expected);
                        },
                        Op::Get(k) => {
                            let expected = model.get_mut(&k).map(|slot| {
                                slot.1 += 1;
                                slot.0
                            });
                            prop_assert_eq!(core.get(&k).copied(), expected);
                        },
                        Op::Remove(k) => {
                            let expected = model.remove(&k).map(|(v, _)| v);
                            prop_assert_eq!(core.remove(&k), expected);
                        },
                    }
                    prop_assert!(core.check_invariants().is_ok());
                    prop_assert_eq!(core.len(), model.len());
                    for (key, (_, frequency)) in &model {
                        prop_assert_eq!(core.frequency(key), Some(*frequency));
                    }
                }
            }
        }
    }

    // ==============================================
    // CONCURRENCY TESTS MODULE
    // ==============================================
    mod concurrency {
        use std::thread;

        use super::*;

        #[test]
        fn test_disjoint_writers_lose_nothing() {
            let threads = 8u32;
            let per_thread = 50u32;
            let cache = BoundedLfuCache::new((threads * per_thread) as usize).unwrap();

            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for i in 0..per_thread {
                            let key = t * per_thread + i;
                            cache.set(key, key + 1);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            for key in 0..threads * per_thread {
                assert_eq!(cache.peek(&key), Some(key + 1));
            }
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_concurrent_gets_count_every_access() {
            let cache = BoundedLfuCache::new(4).unwrap();
            cache.set("hot", 0u8);

            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for _ in 0..250 {
                            assert_eq!(cache.get(&"hot"), Some(0));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            assert_eq!(cache.frequency(&"hot"), Some(1 + 8 * 250));
        }

        #[test]
        fn test_mixed_workload_keeps_structure_consistent() {
            let cache = BoundedLfuCache::new(10).unwrap();
            let handles: Vec<_> = (0..6u64)
                .map(|t| {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for i in 0..1_000u64 {
                            let key = (i * 31 + t) % 40;
                            match i % 4 {
                                0 | 1 => {
                                    cache.set(key, key);
                                },
                                2 => {
                                    if let Some(value) = cache.get(&key) {
                                        assert_eq!(value, key);
                                    }
                                },
                                _ => {
                                    cache.remove(&key);
                                },
                            }
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            assert!(cache.len() <= 10);
            cache.check_invariants().unwrap();
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn test_metrics_count_hits_misses_and_evictions() {
            let cache = BoundedLfuCache::new(1).unwrap();
            cache.set(1, 1);
            cache.set(1, 2);
            cache.set(2, 2);
            cache.get(&1);
            cache.get(&2);

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_new, 2);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.cache_len, 1);
        }
    }
}
