use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest priority a task can carry (rendered last in ascending order)
pub const PRIORITY_MIN: u8 = 1;
/// Highest priority a task can carry
pub const PRIORITY_MAX: u8 = 5;

/// A single increment logged toward a task's numeric goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Amount added toward the goal (may be fractional)
    pub added_amount: f64,
    /// When the increment was logged
    pub date: DateTime<Utc>,
}

/// Incremental progress toward a numeric goal ("ml of water", "pages read")
/// as opposed to a binary complete/incomplete flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionLog {
    /// Display unit for the goal
    pub unit: String,
    /// Goal amount; must be positive for a fraction to be computable
    pub total: f64,
    /// Logged increments in the order they were recorded
    pub histories: Vec<LogEntry>,
}

impl CompletionLog {
    /// Sum of all logged increments
    pub fn current(&self) -> f64 {
        self.histories.iter().map(|h| h.added_amount).sum()
    }

    /// Whether the logged amount has reached the goal
    pub fn is_reached(&self) -> bool {
        self.total > 0.0 && self.current() >= self.total
    }
}

/// A task as rendered on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Stable unique identifier, assigned at creation and never reassigned.
    /// Reconciliation matches tasks across snapshots by this id.
    pub id: String,
    /// Display label (non-empty for valid tasks)
    pub text: String,
    /// Priority in `[PRIORITY_MIN, PRIORITY_MAX]`; drives color and ordering
    pub priority: u8,
    /// Binary completion flag
    pub is_completed: bool,
    /// Present when the task tracks a numeric goal instead of a checkbox
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_log: Option<CompletionLog>,
    /// Free-form markdown description; opaque to the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md_text: Option<String>,
}

impl Task {
    /// Create a task with no completion log or description
    pub fn new(id: impl Into<String>, text: impl Into<String>, priority: u8) -> Self {
        Task {
            id: id.into(),
            text: text.into(),
            priority,
            is_completed: false,
            completion_log: None,
            md_text: None,
        }
    }

    /// Completed for rendering purposes: either the flag is set, or the
    /// completion log has reached its goal. The flag may lag the log after
    /// an increment is added; renderers treat the task as done either way.
    pub fn is_effectively_completed(&self) -> bool {
        if self.is_completed {
            return true;
        }
        self.completion_log
            .as_ref()
            .is_some_and(|log| log.is_reached())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
