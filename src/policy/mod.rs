//! Eviction policies.
//!
//! Each policy has an unsynchronized `*Core` and a thread-safe `Bounded*`
//! handle wrapping it in `Arc<parking_lot::RwLock<_>>`.

pub mod lfu;
pub mod lru;

/// Upper bound on entries reserved at construction; storage grows on demand
/// past this point.
pub(crate) const MAX_PREALLOCATED_ENTRIES: usize = 1024;
