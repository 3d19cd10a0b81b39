//! # Metrics Traits
//!
//! ```text
//!   ┌─────────────────────────────┐        ┌──────────────────────────────┐
//!   │     CoreMetricsRecorder     │        │ MetricsSnapshotProvider<S>   │
//!   │  get_hit/get_miss/insert    │        │  snapshot() → S              │
//!   │  evict/clear                │        │                              │
//!   └──────────────┬──────────────┘        └──────────────┬───────────────┘
//!                  │ written by                           │ read by
//!                  ▼                                      ▼
//!          LruCore / LfuCore                  BoundedLruCache / BoundedLfuCache
//!          (under the write lock)             (under the read lock)
//! ```
//!
//! Recorders only write counters; providers only read them.

/// Counters shared by every cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Produces a point-in-time copy of a cache's counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
