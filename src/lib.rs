//! boundkit: bounded thread-safe caches (LRU, LFU) and a position-indexed
//! d-ary min-heap.
//!
//! Every structure comes in two layers: an unsynchronized core that owns the
//! data and a cheap-to-clone handle that wraps it in
//! `Arc<parking_lot::RwLock<_>>`.
//!
//! ## Locking
//!
//! - Each handle operation takes the lock once and finishes its work inside
//!   that critical section.
//! - Cache `get` reorders eviction state, so it takes the write lock.
//!   `peek`, `contains`, `len` and `frequency` share the read lock.
//! - Heap `peek`, `contains`, `len` and `is_empty` share the read lock. `top`
//!   pops the minimum under a single write lock.
//! - Values and elements are returned as clones; no reference outlives a
//!   guard.
//!
//! Every core and handle exposes `check_invariants()`, which cross-checks
//! the position or key index against the storage it points into.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
