use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::model::task::Task;

/// Ordering applied to a snapshot before slots are assigned.
/// Selected by the UI and persisted with its settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Priority 1 first
    PriorityAscending,
    /// Priority 5 first
    PriorityDescending,
}

/// Stable sort by priority. Tasks with equal priority keep their original
/// relative order, so re-sorting never visually shuffles the board.
pub fn sort_tasks(tasks: &[Task], order: SortOrder) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    match order {
        SortOrder::PriorityAscending => sorted.sort_by_key(|t| t.priority),
        SortOrder::PriorityDescending => sorted.sort_by_key(|t| Reverse(t.priority)),
    }
    sorted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
