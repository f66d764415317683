use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How many slots a collection's board may occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityPolicy {
    /// Fixed grid: slots `0..capacity`, freed slots may be reclaimed
    Bounded(usize),
    /// Append-only growth: slots are never reused once assigned
    Unbounded,
}

/// Error when a bounded board has no free slot left
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("collection is full: all {capacity} slots are occupied")]
pub struct CapacityError {
    pub capacity: usize,
}

/// The id → slot table for one rendering session.
///
/// A task keeps its slot for as long as it lives on the board; only
/// `release` frees a slot and only `claim` assigns one, so an unrelated
/// change can never move a puzzle piece to a different cell. Unbounded
/// boards allocate past the high-water mark: a released slot stays empty,
/// matching the floor stack where removed floors are not backfilled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMap {
    slots: IndexMap<String, usize>,
    /// Lowest slot index never assigned in this session
    high_water: usize,
}

impl SlotMap {
    pub fn new() -> Self {
        SlotMap::default()
    }

    /// Slot currently held by a task
    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.slots.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Number of occupied slots
    pub fn occupied_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether no task holds the given slot
    pub fn is_free(&self, slot: usize) -> bool {
        !self.slots.values().any(|&s| s == slot)
    }

    /// One past the highest slot ever assigned in this session
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Occupied `(id, slot)` pairs in assignment order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.slots.iter().map(|(id, &slot)| (id.as_str(), slot))
    }

    /// Free the slot held by a task. Returns the freed slot index, or
    /// `None` if the task held none.
    pub fn release(&mut self, id: &str) -> Option<usize> {
        self.slots.shift_remove(id)
    }

    /// Assign the next slot under the given policy. Claiming an id that
    /// already holds a slot returns that slot unchanged. Bounded boards
    /// hand out the lowest-index free slot; unbounded boards always grow.
    pub fn claim(&mut self, id: &str, policy: CapacityPolicy) -> Result<usize, CapacityError> {
        if let Some(&slot) = self.slots.get(id) {
            return Ok(slot);
        }
        let slot = match policy {
            CapacityPolicy::Bounded(capacity) => (0..capacity)
                .find(|&s| self.is_free(s))
                .ok_or(CapacityError { capacity })?,
            CapacityPolicy::Unbounded => self.high_water,
        };
        self.slots.insert(id.to_string(), slot);
        if slot >= self.high_water {
            self.high_water = slot + 1;
        }
        Ok(slot)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
