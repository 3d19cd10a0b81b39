pub mod dary_heap;
pub mod intrusive_list;
pub mod slot_arena;

pub use dary_heap::{DaryHeapCore, MAX_BRANCHING_FACTOR, MIN_BRANCHING_FACTOR, PositionIndexedHeap};
pub use intrusive_list::IntrusiveList;
pub use slot_arena::{SlotArena, SlotId};
