//! Error types for the boundkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when construction parameters are invalid
//!   (zero capacity, branching factor outside `[2, 10]`). The object is never
//!   created.
//! - [`InvariantError`]: Returned by the `check_invariants` diagnostics when an
//!   index and the structure it points into disagree.
//!
//! Lookups that find nothing are not errors: they surface as `None` or `false`.
//!
//! ## Example Usage
//!
//! ```
//! use boundkit::error::ConfigError;
//! use boundkit::policy::lru::BoundedLruCache;
//!
//! let cache: Result<BoundedLruCache<u64, String>, ConfigError> = BoundedLruCache::new(16);
//! assert!(cache.is_ok());
//!
//! let bad = BoundedLruCache::<u64, String>::new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal invariants are violated.
///
/// Produced by `check_invariants` methods (e.g.
/// [`DaryHeapCore::check_invariants`](crate::ds::DaryHeapCore::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when construction parameters are invalid.
///
/// Produced by every fallible constructor:
/// [`PositionIndexedHeap::new`](crate::ds::PositionIndexedHeap::new),
/// [`BoundedLruCache::new`](crate::policy::lru::BoundedLruCache::new),
/// [`BoundedLfuCache::new`](crate::policy::lfu::BoundedLfuCache::new) and
/// [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use boundkit::ds::PositionIndexedHeap;
///
/// let err = PositionIndexedHeap::<u32>::new(11).unwrap_err();
/// assert!(err.to_string().contains("branching factor"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }

    /// Validates a cache capacity, rejecting zero.
    pub(crate) fn check_capacity(capacity: usize) -> Result<(), Self> {
        if capacity == 0 {
            tracing::debug!(capacity, "rejected cache configuration");
            return Err(Self::new("capacity must be > 0"));
        }
        Ok(())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
