//! Optional per-cache counters (`metrics` feature).
//!
//! Recording is split from consumption: the cache cores own a
//! [`CacheMetrics`](metrics_impl::CacheMetrics) recorder and bump it under the
//! lock they already hold; callers read a [`CacheMetricsSnapshot`] through
//! [`MetricsSnapshotProvider`](traits::MetricsSnapshotProvider).

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use snapshot::CacheMetricsSnapshot;
pub use traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
