pub mod check;
pub mod progress;
pub mod reconcile;
pub mod sort;

pub use check::{CheckError, CheckResult, CheckWarning, check_collection};
pub use progress::{
    ProgressError, collection_progress, completed_count, is_collection_complete, progress,
    progress_or_zero,
};
pub use reconcile::{ReconcileError, SlotOp, reconcile};
pub use sort::{SortOrder, sort_tasks};
