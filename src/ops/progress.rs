use crate::model::slots::{CapacityPolicy, SlotMap};
use crate::model::task::Task;

/// Error type for progress computation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgressError {
    /// A completion log with a non-positive goal cannot yield a fraction
    #[error("completion log total must be positive, got {total}")]
    InvalidLog { total: f64 },
}

/// Fraction of a task complete, in `[0, 1]`.
///
/// With a completion log the fraction is `current / total`, clamped to 1
/// once the goal is passed; without one it collapses to the binary flag.
/// Every rendering surface reads this same function, so completion state
/// never diverges between the scene and the widget for one task.
pub fn progress(task: &Task) -> Result<f64, ProgressError> {
    match &task.completion_log {
        Some(log) => {
            if log.total <= 0.0 {
                return Err(ProgressError::InvalidLog { total: log.total });
            }
            Ok((log.current() / log.total).min(1.0))
        }
        None => Ok(if task.is_completed { 1.0 } else { 0.0 }),
    }
}

/// Progress with the rendering-pipeline policy for bad data: an invalid
/// log is a data-integrity issue to report, not a reason to fail a draw
/// pass, so it is logged and shown as 0%.
pub fn progress_or_zero(task: &Task) -> f64 {
    match progress(task) {
        Ok(fraction) => fraction,
        Err(err) => {
            tracing::warn!(id = %task.id, %err, "skipping invalid completion log");
            0.0
        }
    }
}

/// Number of tasks rendered as complete (drives the widget coin count)
pub fn completed_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.is_effectively_completed()).count()
}

/// Mean progress across a collection, 0 for an empty one (the widget ring)
pub fn collection_progress(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let sum: f64 = tasks.iter().map(progress_or_zero).sum();
    sum / tasks.len() as f64
}

/// Whether the board should play its completion animation: every slot
/// filled (bounded) or any tasks at all (unbounded), with every task
/// rendered as complete. Derived from the slot table and task state, not
/// tracked inside the engine.
pub fn is_collection_complete(tasks: &[Task], mapping: &SlotMap, policy: CapacityPolicy) -> bool {
    let filled = match policy {
        CapacityPolicy::Bounded(capacity) => mapping.occupied_count() == capacity,
        CapacityPolicy::Unbounded => !tasks.is_empty(),
    };
    filled && tasks.iter().all(|t| t.is_effectively_completed())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
