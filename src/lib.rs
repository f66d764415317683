//! Reconciliation core for a gamified task board.
//!
//! Given the snapshot a renderer currently shows and the authoritative
//! task list, the engine computes the minimal ordered set of slot
//! operations — keep, update, remove, insert — needed to bring a
//! slot-based visual layout in sync, while keeping every surviving
//! task's slot stable across passes. The same core serves the platformer
//! floor stack (unbounded, append-only slots), the puzzle grid (bounded,
//! lowest-free-slot), and widget snapshot building (progress queries).

pub mod adapter;
pub mod model;
pub mod ops;
pub mod session;

pub use adapter::{SlotRenderer, apply_ops};
pub use model::{
    CapacityError, CapacityPolicy, CollectionStyle, CompletionLog, GridPos, LogEntry,
    PuzzleConfig, SlotMap, Task, TaskCollection,
};
pub use ops::{ReconcileError, SlotOp, SortOrder, reconcile, sort_tasks};
pub use session::{CollectionSession, SessionRegistry};
