//! Unified cache builder for both eviction policies.
//!
//! Picks an LRU or LFU cache at runtime behind one [`SharedCache`] type, so
//! callers can switch policy through configuration rather than generics.
//!
//! ## Example
//!
//! ```rust
//! use boundkit::builder::{CacheBuilder, CachePolicy};
//!
//! let cache = CacheBuilder::new(100)
//!     .try_build::<u64, String>(CachePolicy::Lru)
//!     .unwrap();
//! cache.set(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some("hello".to_string()));
//!
//! assert!(CacheBuilder::new(0).try_build::<u64, String>(CachePolicy::Lfu).is_err());
//! ```

use std::hash::Hash;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::policy::lfu::BoundedLfuCache;
use crate::policy::lru::BoundedLruCache;
use crate::traits::SharedCache;

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction, ties broken by smallest key.
    Lfu,
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(CachePolicy::Lru),
            "lfu" => Ok(CachePolicy::Lfu),
            other => {
                tracing::debug!(policy = other, "rejected cache policy name");
                Err(ConfigError::new(format!("unknown cache policy: {other}")))
            },
        }
    }
}

/// Thread-safe cache with a policy chosen at build time.
///
/// Clones share the same underlying cache.
pub enum Cache<K, V>
where
    K: Eq + Hash + Ord,
{
    Lru(BoundedLruCache<K, V>),
    Lfu(BoundedLfuCache<K, V>),
}

impl<K, V> Clone for Cache<K, V>
where
    K: Eq + Hash + Ord,
{
    fn clone(&self) -> Self {
        match self {
            Cache::Lru(lru) => Cache::Lru(lru.clone()),
            Cache::Lfu(lfu) => Cache::Lfu(lfu.clone()),
        }
    }
}

impl<K, V> std::fmt::Debug for Cache<K, V>
where
    K: Eq + Hash + Ord,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cache::Lru(lru) => f.debug_tuple("Lru").field(lru).finish(),
            Cache::Lfu(lfu) => f.debug_tuple("Lfu").field(lfu).finish(),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Ord + Clone,
    V: Clone,
{
    pub fn policy(&self) -> CachePolicy {
        match self {
            Cache::Lru(_) => CachePolicy::Lru,
            Cache::Lfu(_) => CachePolicy::Lfu,
        }
    }

    /// Insert a key-value pair. Returns the previous value if the key existed.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        match self {
            Cache::Lru(lru) => lru.set(key, value),
            Cache::Lfu(lfu) => lfu.set(key, value),
        }
    }

    /// Get a clone of a value by key, recording the access.
    pub fn get(&self, key: &K) -> Option<V> {
        match self {
            Cache::Lru(lru) => lru.get(key),
            Cache::Lfu(lfu) => lfu.get(key),
        }
    }

    pub fn peek(&self, key: &K) -> Option<V> {
        match self {
            Cache::Lru(lru) => lru.peek(key),
            Cache::Lfu(lfu) => lfu.peek(key),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        match self {
            Cache::Lru(lru) => lru.contains(key),
            Cache::Lfu(lfu) => lfu.contains(key),
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        match self {
            Cache::Lru(lru) => lru.remove(key),
            Cache::Lfu(lfu) => lfu.remove(key),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Cache::Lru(lru) => lru.len(),
            Cache::Lfu(lfu) => lfu.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        match self {
            Cache::Lru(lru) => lru.capacity(),
            Cache::Lfu(lfu) => lfu.capacity(),
        }
    }

    pub fn clear(&self) {
        match self {
            Cache::Lru(lru) => lru.clear(),
            Cache::Lfu(lfu) => lfu.clear(),
        }
    }
}

impl<K, V> SharedCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Ord + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn set(&self, key: K, value: V) -> Option<V> {
        Cache::set(self, key, value)
    }

    fn get(&self, key: &K) -> Option<V> {
        Cache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        Cache::contains(self, key)
    }

    fn len(&self) -> usize {
        Cache::len(self)
    }

    fn capacity(&self) -> usize {
        Cache::capacity(self)
    }

    fn clear(&self) {
        Cache::clear(self)
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Build a cache with the specified policy.
    ///
    /// Fails with [`ConfigError`] when the capacity is zero.
    ///
    /// # Type Parameters
    ///
    /// - `K`: Key type, must be `Eq + Hash + Ord + Clone` (LFU breaks ties by key)
    /// - `V`: Value type, must be `Clone`
    ///
    /// # Example
    ///
    /// ```rust
    /// use boundkit::builder::{CacheBuilder, CachePolicy};
    ///
    /// let lru = CacheBuilder::new(100).try_build::<u64, String>(CachePolicy::Lru).unwrap();
    /// let lfu = CacheBuilder::new(100).try_build::<u64, String>("lfu".parse().unwrap()).unwrap();
    /// assert_eq!(lfu.policy(), CachePolicy::Lfu);
    /// assert_eq!(lru.capacity(), 100);
    /// ```
    pub fn try_build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Ord + Clone,
        V: Clone,
    {
        let cache = match policy {
            CachePolicy::Lru => Cache::Lru(BoundedLruCache::new(self.capacity)?),
            CachePolicy::Lfu => Cache::Lfu(BoundedLfuCache::new(self.capacity)?),
        };
        tracing::debug!(capacity = self.capacity, ?policy, "built cache");
        Ok(cache)
    }
}
