use crate::model::task::Task;
use crate::ops::reconcile::SlotOp;

/// The rendering side of the engine boundary.
///
/// Implementations own a node-per-slot table keyed by slot index — a
/// floor stack, a puzzle grid, a widget snapshot builder — and never
/// scan a scene graph to find the node for a task.
pub trait SlotRenderer {
    /// Create the visual for a task at a freshly claimed slot
    fn insert_task(&mut self, task: &Task, slot: usize);
    /// Tear down the visual at a freed slot
    fn remove_task(&mut self, id: &str, slot: usize);
    /// Redraw an existing visual; old and new carry the transition
    fn update_task(&mut self, old: &Task, new: &Task);
    /// An unchanged task; most renderers ignore this
    fn keep_task(&mut self, _id: &str) {}
}

/// Drive a renderer through an operation list. `tasks` is the new
/// authoritative snapshot, used to resolve inserted ids to task values.
pub fn apply_ops(ops: &[SlotOp], tasks: &[Task], renderer: &mut dyn SlotRenderer) {
    for op in ops {
        match op {
            SlotOp::Keep { id } => renderer.keep_task(id),
            SlotOp::Update { old, new, .. } => renderer.update_task(old, new),
            SlotOp::Remove { id, slot } => renderer.remove_task(id, *slot),
            SlotOp::Insert { id, slot } => match tasks.iter().find(|t| &t.id == id) {
                Some(task) => renderer.insert_task(task, *slot),
                None => tracing::warn!(%id, "insert op for task missing from snapshot"),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
