use std::collections::HashSet;

use serde::Serialize;

use crate::model::collection::{CollectionStyle, TaskCollection};
use crate::model::task::{PRIORITY_MAX, PRIORITY_MIN, Task};

/// Structured result of an integrity pass over one collection.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A data-integrity error (upstream store bug or corrupted record).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// Two tasks share an id
    #[serde(rename = "duplicate_id")]
    DuplicateId { task_id: String },
    /// Priority outside the accepted range
    #[serde(rename = "priority_out_of_range")]
    PriorityOutOfRange { task_id: String, priority: u8 },
    /// Completion log with a non-positive goal
    #[serde(rename = "invalid_completion_log")]
    InvalidCompletionLog { task_id: String, total: f64 },
    /// More tasks than the puzzle board has cells
    #[serde(rename = "over_capacity")]
    OverCapacity {
        collection_id: String,
        count: usize,
        capacity: usize,
    },
    /// Puzzle style without grid geometry, or a grid with no cells
    #[serde(rename = "invalid_grid")]
    InvalidGrid { collection_id: String },
}

/// A non-critical inconsistency worth surfacing.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Task has no display text
    #[serde(rename = "empty_text")]
    EmptyText { task_id: String },
    /// Completion log reached its goal but the flag is still false
    #[serde(rename = "completion_flag_lagging")]
    CompletionFlagLagging { task_id: String },
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate a collection and its tasks. Read-only.
///
/// Checks performed:
/// 1. No duplicate task ids
/// 2. Priorities within `[PRIORITY_MIN, PRIORITY_MAX]`
/// 3. Completion logs have positive goals
/// 4. Puzzle collections have a usable grid and fit within it
/// 5. Warnings for empty labels and completion flags lagging their logs
pub fn check_collection(collection: &TaskCollection, tasks: &[Task]) -> CheckResult {
    let mut result = CheckResult::default();

    let mut seen = HashSet::new();
    for task in tasks {
        if !seen.insert(task.id.as_str()) {
            result.errors.push(CheckError::DuplicateId {
                task_id: task.id.clone(),
            });
        }
        check_task(task, &mut result);
    }

    check_grid(collection, tasks.len(), &mut result);

    result.valid = result.errors.is_empty();
    result
}

// ---------------------------------------------------------------------------
// Per-task validation
// ---------------------------------------------------------------------------

fn check_task(task: &Task, result: &mut CheckResult) {
    if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&task.priority) {
        result.errors.push(CheckError::PriorityOutOfRange {
            task_id: task.id.clone(),
            priority: task.priority,
        });
    }

    if task.text.trim().is_empty() {
        result.warnings.push(CheckWarning::EmptyText {
            task_id: task.id.clone(),
        });
    }

    if let Some(log) = &task.completion_log {
        if log.total <= 0.0 {
            result.errors.push(CheckError::InvalidCompletionLog {
                task_id: task.id.clone(),
                total: log.total,
            });
        } else if log.is_reached() && !task.is_completed {
            result.warnings.push(CheckWarning::CompletionFlagLagging {
                task_id: task.id.clone(),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Grid validation
// ---------------------------------------------------------------------------

fn check_grid(collection: &TaskCollection, task_count: usize, result: &mut CheckResult) {
    match (&collection.style, &collection.puzzle_config) {
        (CollectionStyle::Puzzle, Some(config)) => {
            if config.num_rows == 0 || config.num_columns == 0 {
                result.errors.push(CheckError::InvalidGrid {
                    collection_id: collection.id.clone(),
                });
            } else if task_count > config.capacity() {
                result.errors.push(CheckError::OverCapacity {
                    collection_id: collection.id.clone(),
                    count: task_count,
                    capacity: config.capacity(),
                });
            }
        }
        (CollectionStyle::Puzzle, None) => {
            result.errors.push(CheckError::InvalidGrid {
                collection_id: collection.id.clone(),
            });
        }
        (CollectionStyle::List, _) => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
