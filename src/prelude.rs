pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::ds::{DaryHeapCore, PositionIndexedHeap};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::CacheMetricsSnapshot;
pub use crate::policy::lfu::{BoundedLfuCache, LfuCore};
pub use crate::policy::lru::{BoundedLruCache, LruCore};
pub use crate::traits::{CoreCache, LfuCacheTrait, LruCacheTrait, MutableCache, SharedCache};
