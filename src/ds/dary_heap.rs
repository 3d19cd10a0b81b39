//! Position-indexed d-ary min-heap.
//!
//! An array-backed min-heap with a configurable branching factor and an
//! auxiliary `element → slot` index. The index turns membership tests into
//! O(1) lookups and lets arbitrary elements be removed or re-prioritized in
//! O(log_B n), which a plain [`BinaryHeap`](std::collections::BinaryHeap)
//! cannot do.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                   DaryHeapCore<T>   (branching_factor = 3)                  │
//! │                                                                             │
//! │   elements: Vec<T>                                                          │
//! │   ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┐                               │
//! │   │  1  │  4  │  2  │  7  │  5  │  9  │  6  │                               │
//! │   └─────┴─────┴─────┴─────┴─────┴─────┴─────┘                               │
//! │     [0]   [1]   [2]   [3]   [4]   [5]   [6]                                 │
//! │                                                                             │
//! │   children of i  = [B·i + 1, B·i + 1 + B)                                   │
//! │   parent of i    = (i − 1) / B                                              │
//! │                                                                             │
//! │                      1                                                      │
//! │            ┌─────────┼─────────┐                                            │
//! │            4         2         7                                            │
//! │        ┌───┼───┐                                                           │
//! │        5   9   6                                                            │
//! │                                                                             │
//! │   positions: FxHashMap<T, usize>   (bijection with [0, len))                │
//! │   ┌─────────┬───────┐                                                       │
//! │   │ element │ slot  │                                                       │
//! │   ├─────────┼───────┤                                                       │
//! │   │    1    │   0   │                                                       │
//! │   │    4    │   1   │                                                       │
//! │   │    2    │   2   │   ...                                                 │
//! │   └─────────┴───────┘                                                       │
//! └─────────────────────────────────────────────────────────────────────────────┘
//!
//! Remove Flow
//! ───────────
//!   remove(&4):
//!     1. idx = positions[4]               → 1
//!     2. swap slot 1 with the last slot   → [1, 6, 2, 7, 5, 9, 4]
//!     3. pop the tail, drop positions[4]
//!     4. positions[6] = 1
//!     5. sift_up(1); if nothing moved → sift_down(1)
//!
//!   The element pulled in from the tail may belong above OR below its new
//!   slot, so both directions are tried, up first.
//! ```
//!
//! ## Operations
//!
//! | Operation         | Description                              | Complexity   |
//! |-------------------|------------------------------------------|--------------|
//! | `add`             | Insert if absent, sift up                | O(log_B n)   |
//! | `peek`            | Minimum without removal                  | O(1)         |
//! | `pop` / `top`     | Remove and return minimum                | O(B·log_B n) |
//! | `contains`        | Membership via position index            | O(1)         |
//! | `remove`          | Remove arbitrary element                 | O(B·log_B n) |
//! | `update_priority` | Replace element in place, reposition     | O(B·log_B n) |
//! | `from_vec`        | Bottom-up heapify                        | O(n)         |
//!
//! ## Thread Safety
//!
//! [`DaryHeapCore`] is not thread-safe and never locks. [`PositionIndexedHeap`]
//! wraps it in a `parking_lot::RwLock`: `peek`, `contains`, `len` and
//! `is_empty` share the read lock; every mutation holds the write lock for
//! its whole critical section. `top` runs the core's slot-removal primitive
//! directly instead of going back through the locking `remove`.
//!
//! ## Example Usage
//!
//! ```
//! use boundkit::ds::PositionIndexedHeap;
//!
//! let heap = PositionIndexedHeap::new(3).unwrap();
//! heap.add(5);
//! heap.add(3);
//! heap.add(7);
//! assert!(!heap.add(3)); // set semantics
//!
//! assert!(heap.update_priority(&7, 1));
//! assert_eq!(heap.top(), Some(1));
//! assert!(heap.remove(&5));
//! assert_eq!(heap.peek(), Some(3));
//! ```
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::{ConfigError, InvariantError};

/// Smallest accepted branching factor.
pub const MIN_BRANCHING_FACTOR: usize = 2;
/// Largest accepted branching factor.
pub const MAX_BRANCHING_FACTOR: usize = 10;

/// Unsynchronized d-ary min-heap with an `element → slot` index.
///
/// Elements are unique: `add` of an element that is already present is
/// rejected. Ordering ties between equal-priority elements are not stable.
///
/// # Example
///
/// ```
/// use boundkit::ds::DaryHeapCore;
///
/// let mut heap = DaryHeapCore::from_vec(4, vec![7, 3, 9, 1, 5]).unwrap();
/// assert_eq!(heap.peek(), Some(&1));
/// assert!(heap.remove(&3));
/// assert_eq!(heap.into_sorted_vec(), vec![1, 5, 7, 9]);
/// ```
#[derive(Debug, Clone)]
pub struct DaryHeapCore<T>
where
    T: Eq + Hash,
{
    elements: Vec<T>,
    positions: FxHashMap<T, usize>,
    branching_factor: usize,
}

impl<T> DaryHeapCore<T>
where
    T: Eq + Hash + Ord + Clone,
{
    /// Creates an empty heap.
    ///
    /// Fails with [`ConfigError`] when `branching_factor` is outside
    /// `[MIN_BRANCHING_FACTOR, MAX_BRANCHING_FACTOR]`.
    pub fn new(branching_factor: usize) -> Result<Self, ConfigError> {
        Self::with_capacity(branching_factor, 0)
    }

    /// Creates an empty heap with room for `capacity` elements.
    pub fn with_capacity(branching_factor: usize, capacity: usize) -> Result<Self, ConfigError> {
        check_branching_factor(branching_factor)?;
        Ok(Self {
            elements: Vec::with_capacity(capacity),
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            branching_factor,
        })
    }

    /// Builds a heap from `initial` in O(n).
    ///
    /// The position index is filled first, then the array is heapified
    /// bottom-up. Repeated elements keep their first occurrence only.
    ///
    /// ```
    /// use boundkit::ds::DaryHeapCore;
    ///
    /// let heap = DaryHeapCore::from_vec(2, vec![4, 2, 4, 8]).unwrap();
    /// assert_eq!(heap.len(), 3);
    /// assert_eq!(heap.peek(), Some(&2));
    /// ```
    pub fn from_vec(branching_factor: usize, initial: Vec<T>) -> Result<Self, ConfigError> {
        let mut heap = Self::with_capacity(branching_factor, initial.len())?;
        for element in initial {
            if heap.positions.contains_key(&element) {
                continue;
            }
            heap.positions.insert(element.clone(), heap.elements.len());
            heap.elements.push(element);
        }
        heap.heapify();
        Ok(heap)
    }

    #[inline]
    pub fn branching_factor(&self) -> usize {
        self.branching_factor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the minimum element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.elements.first()
    }

    #[inline]
    pub fn contains(&self, element: &T) -> bool {
        self.positions.contains_key(element)
    }

    /// Inserts `element`; returns `false` and leaves the heap untouched if it
    /// is already present.
    pub fn add(&mut self, element: T) -> bool {
        if self.positions.contains_key(&element) {
            return false;
        }
        let idx = self.elements.len();
        self.positions.insert(element.clone(), idx);
        self.elements.push(element);
        self.sift_up(idx);
        true
    }

    /// Removes and returns the minimum element.
    pub fn pop(&mut self) -> Option<T> {
        if self.elements.is_empty() {
            return None;
        }
        self.remove_at(0)
    }

    /// Removes `element`; returns `false` if it was not present.
    pub fn remove(&mut self, element: &T) -> bool {
        match self.positions.get(element).copied() {
            Some(idx) => self.remove_at(idx).is_some(),
            None => false,
        }
    }

    /// Replaces `old` with `new` in `old`'s slot and restores heap order.
    ///
    /// Returns `false` (heap unchanged) when `old` is absent.
    ///
    /// `new` must not already be present anywhere else in the heap. Debug
    /// builds assert on this; release builds leave the index inconsistent.
    pub fn update_priority(&mut self, old: &T, new: T) -> bool {
        let Some(&idx) = self.positions.get(old) else {
            return false;
        };
        debug_assert!(
            *old == new || !self.positions.contains_key(&new),
            "update_priority target is already present in the heap"
        );
        self.positions.remove(old);
        self.positions.insert(new.clone(), idx);
        self.elements[idx] = new;
        self.restore(idx);
        true
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.positions.clear();
    }

    /// Moves all elements out, leaving an empty heap with the same factor.
    fn take_all(&mut self) -> Self {
        Self {
            elements: std::mem::take(&mut self.elements),
            positions: std::mem::take(&mut self.positions),
            branching_factor: self.branching_factor,
        }
    }

    /// Consumes the heap and returns its elements in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.elements.len());
        while let Some(element) = self.pop() {
            sorted.push(element);
        }
        sorted
    }

    /// Verifies heap order and that `positions` is a bijection onto the slots.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let len = self.elements.len();
        if self.positions.len() != len {
            return Err(InvariantError::new(format!(
                "position index holds {} entries for {len} elements",
                self.positions.len()
            )));
        }
        for (idx, element) in self.elements.iter().enumerate() {
            if self.positions.get(element) != Some(&idx) {
                return Err(InvariantError::new(format!(
                    "position index is stale for slot {idx}"
                )));
            }
            let first = self.first_child(idx);
            let last = first.saturating_add(self.branching_factor).min(len);
            for child in first..last {
                if self.elements[child] < *element {
                    return Err(InvariantError::new(format!(
                        "heap order violated between slot {idx} and child {child}"
                    )));
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn first_child(&self, idx: usize) -> usize {
        self.branching_factor * idx + 1
    }

    #[inline]
    fn parent(&self, idx: usize) -> usize {
        (idx - 1) / self.branching_factor
    }

    /// Removes the element at `idx` by swapping in the tail element.
    ///
    /// Lock-free primitive shared by `pop` and `remove`.
    fn remove_at(&mut self, idx: usize) -> Option<T> {
        let last = self.elements.len().checked_sub(1)?;
        self.elements.swap(idx, last);
        let removed = self.elements.pop()?;
        self.positions.remove(&removed);
        if idx < self.elements.len() {
            if let Some(pos) = self.positions.get_mut(&self.elements[idx]) {
                *pos = idx;
            }
            self.restore(idx);
        }
        Some(removed)
    }

    /// Re-establishes order around `idx` after its element was replaced.
    fn restore(&mut self, idx: usize) {
        if !self.sift_up(idx) {
            self.sift_down(idx);
        }
    }

    /// Moves the element at `idx` toward the root; returns whether it moved.
    fn sift_up(&mut self, mut idx: usize) -> bool {
        let mut moved = false;
        while idx > 0 {
            let parent = self.parent(idx);
            if self.elements[idx] < self.elements[parent] {
                self.swap_slots(idx, parent);
                idx = parent;
                moved = true;
            } else {
                break;
            }
        }
        moved
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.elements.len();
        loop {
            let first = self.first_child(idx);
            if first >= len {
                break;
            }
            let last = (first + self.branching_factor).min(len);
            let mut min_child = first;
            for child in first + 1..last {
                if self.elements[child] < self.elements[min_child] {
                    min_child = child;
                }
            }
            if self.elements[min_child] < self.elements[idx] {
                self.swap_slots(idx, min_child);
                idx = min_child;
            } else {
                break;
            }
        }
    }

    fn heapify(&mut self) {
        let len = self.elements.len();
        if len < 2 {
            return;
        }
        for idx in (0..=self.parent(len - 1)).rev() {
            self.sift_down(idx);
        }
    }

    fn swap_slots(&mut self, a: usize, b: usize) {
        self.elements.swap(a, b);
        if let Some(pos) = self.positions.get_mut(&self.elements[a]) {
            *pos = a;
        }
        if let Some(pos) = self.positions.get_mut(&self.elements[b]) {
            *pos = b;
        }
    }
}

impl<T> Default for DaryHeapCore<T>
where
    T: Eq + Hash,
{
    /// Creates an empty binary heap.
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            positions: FxHashMap::default(),
            branching_factor: MIN_BRANCHING_FACTOR,
        }
    }
}

impl<T> Extend<T> for DaryHeapCore<T>
where
    T: Eq + Hash + Ord + Clone,
{
    /// Adds every element, skipping ones already present.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.add(element);
        }
    }
}

fn check_branching_factor(branching_factor: usize) -> Result<(), ConfigError> {
    if (MIN_BRANCHING_FACTOR..=MAX_BRANCHING_FACTOR).contains(&branching_factor) {
        return Ok(());
    }
    tracing::debug!(branching_factor, "rejected heap configuration");
    Err(ConfigError::new(format!(
        "branching factor must be in [{MIN_BRANCHING_FACTOR}, {MAX_BRANCHING_FACTOR}], got {branching_factor}"
    )))
}

/// Thread-safe position-indexed d-ary min-heap.
///
/// Cloning the handle shares the same heap. Reads return clones of elements;
/// no reference into the heap escapes the lock.
///
/// # Example
///
/// ```
/// use boundkit::ds::PositionIndexedHeap;
/// use std::thread;
///
/// let heap = PositionIndexedHeap::new(4).unwrap();
/// let handles: Vec<_> = (0..4u32)
///     .map(|t| {
///         let heap = heap.clone();
///         thread::spawn(move || {
///             for i in 0..100 {
///                 heap.add(t * 100 + i);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(heap.len(), 400);
/// assert_eq!(heap.top(), Some(0));
/// ```
#[derive(Clone)]
pub struct PositionIndexedHeap<T>
where
    T: Eq + Hash,
{
    inner: Arc<RwLock<DaryHeapCore<T>>>,
}

impl<T> PositionIndexedHeap<T>
where
    T: Eq + Hash + Ord + Clone,
{
    /// Creates an empty heap; fails if `branching_factor` is outside `[2, 10]`.
    pub fn new(branching_factor: usize) -> Result<Self, ConfigError> {
        DaryHeapCore::new(branching_factor).map(Self::from_core)
    }

    pub fn with_capacity(branching_factor: usize, capacity: usize) -> Result<Self, ConfigError> {
        DaryHeapCore::with_capacity(branching_factor, capacity).map(Self::from_core)
    }

    /// Builds a heap from `initial` with a bottom-up heapify.
    pub fn from_vec(branching_factor: usize, initial: Vec<T>) -> Result<Self, ConfigError> {
        DaryHeapCore::from_vec(branching_factor, initial).map(Self::from_core)
    }

    fn from_core(core: DaryHeapCore<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(core)),
        }
    }

    /// Inserts `element`; returns `false` if it is already present.
    pub fn add(&self, element: T) -> bool {
        let mut heap = self.inner.write();
        heap.add(element)
    }

    /// Returns a clone of the minimum element.
    pub fn peek(&self) -> Option<T> {
        let heap = self.inner.read();
        heap.peek().cloned()
    }

    /// Removes and returns the minimum element in one critical section.
    pub fn top(&self) -> Option<T> {
        let mut heap = self.inner.write();
        heap.pop()
    }

    pub fn contains(&self, element: &T) -> bool {
        let heap = self.inner.read();
        heap.contains(element)
    }

    /// Removes `element`; returns `false` if it was not present.
    pub fn remove(&self, element: &T) -> bool {
        let mut heap = self.inner.write();
        heap.remove(element)
    }

    /// Replaces `old` with `new` and repositions it.
    ///
    /// Returns `false` when `old` is absent. `new` must not already be in the
    /// heap; see [`DaryHeapCore::update_priority`].
    pub fn update_priority(&self, old: &T, new: T) -> bool {
        let mut heap = self.inner.write();
        heap.update_priority(old, new)
    }

    pub fn len(&self) -> usize {
        let heap = self.inner.read();
        heap.len()
    }

    pub fn is_empty(&self) -> bool {
        let heap = self.inner.read();
        heap.is_empty()
    }

    pub fn clear(&self) {
        let mut heap = self.inner.write();
        heap.clear();
    }

    pub fn branching_factor(&self) -> usize {
        let heap = self.inner.read();
        heap.branching_factor()
    }

    /// Removes every element and returns them in ascending order.
    pub fn drain_sorted(&self) -> Vec<T> {
        let drained = {
            let mut heap = self.inner.write();
            heap.take_all()
        };
        drained.into_sorted_vec()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let heap = self.inner.read();
        heap.check_invariants()
    }
}

impl<T> Default for PositionIndexedHeap<T>
where
    T: Eq + Hash + Ord + Clone,
{
    /// Creates an empty binary heap.
    fn default() -> Self {
        Self::from_core(DaryHeapCore::default())
    }
}

impl<T> fmt::Debug for PositionIndexedHeap<T>
where
    T: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heap = self.inner.read();
        f.debug_struct("PositionIndexedHeap")
            .field("len", &heap.elements.len())
            .field("branching_factor", &heap.branching_factor)
            .finish_non_exhaustive()
    }
}
