use serde::{Deserialize, Serialize};

use super::slots::CapacityPolicy;

/// Visual style of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStyle {
    /// Sequential layout: one floor per task, stacked in order
    List,
    /// Fixed grid of puzzle pieces over a background image
    Puzzle,
}

/// Grid geometry for puzzle-style collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub num_rows: usize,
    pub num_columns: usize,
    /// Reference to the board's background artwork
    pub background_image_ref: String,
}

/// Position of a slot on the puzzle grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub column: usize,
}

impl PuzzleConfig {
    /// Total number of slots on the board
    pub fn capacity(&self) -> usize {
        self.num_rows * self.num_columns
    }

    /// Row/column of a slot index, filling row-major so slot 0 is the
    /// top-left cell and holds the highest-ranked task after sorting.
    /// Requires `num_columns >= 1` (validated by the integrity pass).
    pub fn grid_pos(&self, slot: usize) -> GridPos {
        GridPos {
            row: slot / self.num_columns,
            column: slot % self.num_columns,
        }
    }
}

/// A named group of tasks sharing one rendering surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCollection {
    pub id: String,
    /// Unique among sibling collections
    pub title: String,
    pub style: CollectionStyle,
    /// Present exactly when `style` is `Puzzle`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub puzzle_config: Option<PuzzleConfig>,
}

impl TaskCollection {
    /// Create a list-style collection
    pub fn list(id: impl Into<String>, title: impl Into<String>) -> Self {
        TaskCollection {
            id: id.into(),
            title: title.into(),
            style: CollectionStyle::List,
            puzzle_config: None,
        }
    }

    /// Create a puzzle-style collection with its grid geometry
    pub fn puzzle(id: impl Into<String>, title: impl Into<String>, config: PuzzleConfig) -> Self {
        TaskCollection {
            id: id.into(),
            title: title.into(),
            style: CollectionStyle::Puzzle,
            puzzle_config: Some(config),
        }
    }

    /// Slot allocation policy for this collection: puzzle boards are
    /// bounded by their grid capacity, list boards grow without limit.
    pub fn capacity_policy(&self) -> CapacityPolicy {
        match &self.puzzle_config {
            Some(config) => CapacityPolicy::Bounded(config.capacity()),
            None => CapacityPolicy::Unbounded,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
