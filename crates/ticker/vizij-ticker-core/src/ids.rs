//! Identifiers and simple allocators for counter entities.

use serde::{Deserialize, Serialize};

/// Handle for one digit slot (wheel) in the slot arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SlotId(pub u32);

/// Handle for one submitted animation batch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BatchId(pub u64);

/// Monotonic allocator for SlotId and BatchId.
/// Ids are never reused within one counter, so a stale handle can't alias a new slot.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_slot: u32,
    next_batch: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_slot(&mut self) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot = self.next_slot.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_batch(&mut self) -> BatchId {
        let id = BatchId(self.next_batch);
        self.next_batch = self.next_batch.wrapping_add(1);
        id
    }
}
