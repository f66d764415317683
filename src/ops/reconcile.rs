use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::model::slots::{CapacityError, CapacityPolicy, SlotMap};
use crate::model::task::Task;

/// Error type for reconciliation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconcileError {
    /// A bounded board has no free slot for an incoming task. The batch is
    /// rejected upstream ("collection is full"); the mapping is untouched.
    #[error(transparent)]
    CapacityExceeded(#[from] CapacityError),
    /// The new snapshot carries two tasks with the same id — a bug in the
    /// task store, caught here before it can corrupt the slot table.
    #[error("duplicate task id in snapshot: {0}")]
    DuplicateId(String),
}

/// One structural mutation a renderer applies to its slot-indexed view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum SlotOp {
    /// Task unchanged; nothing to redraw
    Keep { id: String },
    /// Same id with at least one field changed; the slot is untouched.
    /// Old and new travel together so the renderer can pick the right
    /// transition (just-completed vs just-reopened vs relabeled).
    Update { id: String, old: Task, new: Task },
    /// Task left the collection; its slot is freed
    Remove { id: String, slot: usize },
    /// Task entered the collection at a freshly claimed slot
    Insert { id: String, slot: usize },
}

impl SlotOp {
    /// The task id this operation addresses
    pub fn id(&self) -> &str {
        match self {
            SlotOp::Keep { id }
            | SlotOp::Update { id, .. }
            | SlotOp::Remove { id, .. }
            | SlotOp::Insert { id, .. } => id,
        }
    }
}

/// Diff `previous` against `new` and bring `mapping` in sync.
///
/// `previous` is the snapshot the renderer currently shows, paired with
/// its slots through `mapping`; `new` is the authoritative list, already
/// sorted by the active order. Removals are emitted first, then
/// keeps/updates in `new` order, then inserts, so a renderer frees visual
/// resources before claiming new ones in the same slot-release cycle.
/// Bounded boards may hand a slot freed by a removal to an insert in the
/// same pass; unbounded boards never reuse slots.
///
/// All mapping mutations are staged and committed only on success: a
/// capacity failure leaves `mapping` exactly as it was.
pub fn reconcile(
    previous: &[Task],
    new: &[Task],
    mapping: &mut SlotMap,
    policy: CapacityPolicy,
) -> Result<Vec<SlotOp>, ReconcileError> {
    let mut seen = HashSet::with_capacity(new.len());
    for task in new {
        if !seen.insert(task.id.as_str()) {
            return Err(ReconcileError::DuplicateId(task.id.clone()));
        }
    }

    let prev_by_id: HashMap<&str, &Task> = previous.iter().map(|t| (t.id.as_str(), t)).collect();
    let new_ids: HashSet<&str> = new.iter().map(|t| t.id.as_str()).collect();

    let mut staged = mapping.clone();

    // Departed tasks free their slots before any insert can claim them
    let mut removes = Vec::new();
    for task in previous {
        if new_ids.contains(task.id.as_str()) {
            continue;
        }
        match staged.release(&task.id) {
            Some(slot) => removes.push(SlotOp::Remove {
                id: task.id.clone(),
                slot,
            }),
            None => {
                // Previous snapshot and mapping disagree; nothing to free
                tracing::warn!(id = %task.id, "removed task had no recorded slot");
            }
        }
    }

    let mut kept = Vec::new();
    let mut inserts = Vec::new();
    for task in new {
        match prev_by_id.get(task.id.as_str()) {
            Some(&old) if old == task => kept.push(SlotOp::Keep {
                id: task.id.clone(),
            }),
            Some(&old) => kept.push(SlotOp::Update {
                id: task.id.clone(),
                old: old.clone(),
                new: task.clone(),
            }),
            None => {
                let slot = staged.claim(&task.id, policy)?;
                inserts.push(SlotOp::Insert {
                    id: task.id.clone(),
                    slot,
                });
            }
        }
    }

    *mapping = staged;

    let mut ops = removes;
    ops.append(&mut kept);
    ops.append(&mut inserts);
    Ok(ops)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Reconcile a fresh snapshot into an empty mapping
    fn seed(tasks: &[Task], mapping: &mut SlotMap, policy: CapacityPolicy) -> Vec<SlotOp> {
        reconcile(&[], tasks, mapping, policy).unwrap()
    }

    #[test]
    fn test_initial_fill_inserts_in_order() {
        let tasks = vec![Task::new("a", "one", 1), Task::new("b", "two", 2)];
        let mut mapping = SlotMap::new();
        let ops = seed(&tasks, &mut mapping, CapacityPolicy::Unbounded);
        assert_eq!(
            ops,
            vec![
                SlotOp::Insert { id: "a".into(), slot: 0 },
                SlotOp::Insert { id: "b".into(), slot: 1 },
            ]
        );
    }

    #[test]
    fn test_identical_snapshots_are_idempotent() {
        let tasks = vec![Task::new("a", "one", 1), Task::new("b", "two", 2)];
        let mut mapping = SlotMap::new();
        seed(&tasks, &mut mapping, CapacityPolicy::Unbounded);

        let before = mapping.clone();
        let ops = reconcile(&tasks, &tasks, &mut mapping, CapacityPolicy::Unbounded).unwrap();
        assert!(ops.iter().all(|op| matches!(op, SlotOp::Keep { .. })));
        assert_eq!(mapping, before);
    }

    #[test]
    fn test_field_change_is_update_with_stable_slot() {
        let tasks = vec![Task::new("a", "one", 1), Task::new("b", "two", 2)];
        let mut mapping = SlotMap::new();
        seed(&tasks, &mut mapping, CapacityPolicy::Bounded(4));

        let mut changed = tasks.clone();
        changed[1].is_completed = true;
        let ops = reconcile(&tasks, &changed, &mut mapping, CapacityPolicy::Bounded(4)).unwrap();

        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0], SlotOp::Keep { id: "a".into() });
        match &ops[1] {
            SlotOp::Update { id, old, new } => {
                assert_eq!(id, "b");
                assert!(!old.is_completed);
                assert!(new.is_completed);
            }
            other => panic!("expected update, got {:?}", other),
        }
        assert_eq!(mapping.slot_of("b"), Some(1));
    }

    #[test]
    fn test_history_growth_is_update_not_remove_insert() {
        use crate::model::task::{CompletionLog, LogEntry};
        use chrono::Utc;

        let mut task = Task::new("a", "hydrate", 3);
        task.completion_log = Some(CompletionLog {
            unit: "ml".into(),
            total: 500.0,
            histories: vec![],
        });
        let mut mapping = SlotMap::new();
        seed(std::slice::from_ref(&task), &mut mapping, CapacityPolicy::Bounded(4));

        let mut logged = task.clone();
        logged
            .completion_log
            .as_mut()
            .unwrap()
            .histories
            .push(LogEntry {
                added_amount: 250.0,
                date: Utc::now(),
            });

        let ops = reconcile(
            std::slice::from_ref(&task),
            std::slice::from_ref(&logged),
            &mut mapping,
            CapacityPolicy::Bounded(4),
        )
        .unwrap();
        assert!(matches!(&ops[..], [SlotOp::Update { id, .. }] if id == "a"));
        assert_eq!(mapping.slot_of("a"), Some(0));
    }

    #[test]
    fn test_removes_come_first_inserts_last() {
        let previous = vec![Task::new("a", "one", 1), Task::new("b", "two", 2)];
        let mut mapping = SlotMap::new();
        seed(&previous, &mut mapping, CapacityPolicy::Unbounded);

        let new = vec![Task::new("b", "two", 2), Task::new("c", "three", 3)];
        let ops = reconcile(&previous, &new, &mut mapping, CapacityPolicy::Unbounded).unwrap();
        assert_eq!(
            ops,
            vec![
                SlotOp::Remove { id: "a".into(), slot: 0 },
                SlotOp::Keep { id: "b".into() },
                SlotOp::Insert { id: "c".into(), slot: 2 },
            ]
        );
    }

    #[test]
    fn test_bounded_insert_reuses_slot_freed_this_pass() {
        let previous = vec![Task::new("a", "one", 1), Task::new("b", "two", 2)];
        let mut mapping = SlotMap::new();
        seed(&previous, &mut mapping, CapacityPolicy::Bounded(2));

        // Board is full; swapping one task for another must fit
        let new = vec![Task::new("b", "two", 2), Task::new("c", "three", 3)];
        let ops = reconcile(&previous, &new, &mut mapping, CapacityPolicy::Bounded(2)).unwrap();
        assert!(ops.contains(&SlotOp::Remove { id: "a".into(), slot: 0 }));
        assert!(ops.contains(&SlotOp::Insert { id: "c".into(), slot: 0 }));
    }

    #[test]
    fn test_unbounded_insert_never_reuses_freed_slot() {
        let previous = vec![Task::new("a", "one", 1), Task::new("b", "two", 2)];
        let mut mapping = SlotMap::new();
        seed(&previous, &mut mapping, CapacityPolicy::Unbounded);

        let new = vec![Task::new("b", "two", 2), Task::new("c", "three", 3)];
        reconcile(&previous, &new, &mut mapping, CapacityPolicy::Unbounded).unwrap();
        assert_eq!(mapping.slot_of("c"), Some(2));
        assert!(mapping.is_free(0));
    }

    #[test]
    fn test_capacity_exceeded_leaves_mapping_untouched() {
        let previous = vec![Task::new("a", "one", 1), Task::new("b", "two", 2)];
        let mut mapping = SlotMap::new();
        seed(&previous, &mut mapping, CapacityPolicy::Bounded(2));
        let before = mapping.clone();

        let mut new = previous.clone();
        new.push(Task::new("c", "three", 3));
        let err = reconcile(&previous, &new, &mut mapping, CapacityPolicy::Bounded(2)).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::CapacityExceeded(CapacityError { capacity: 2 })
        );
        assert_eq!(mapping, before);
    }

    #[test]
    fn test_capacity_failure_rolls_back_removals_too() {
        let previous = vec![Task::new("a", "one", 1), Task::new("b", "two", 2)];
        let mut mapping = SlotMap::new();
        seed(&previous, &mut mapping, CapacityPolicy::Bounded(2));
        let before = mapping.clone();

        // One removal cannot make room for two inserts; the freed slot
        // must not leak out of the failed batch.
        let new = vec![
            Task::new("b", "two", 2),
            Task::new("c", "three", 3),
            Task::new("d", "four", 4),
        ];
        let result = reconcile(&previous, &new, &mut mapping, CapacityPolicy::Bounded(2));
        assert!(result.is_err());
        assert_eq!(mapping, before);
        assert_eq!(mapping.slot_of("a"), Some(0));
    }

    #[test]
    fn test_duplicate_id_in_snapshot_is_rejected() {
        let new = vec![Task::new("a", "one", 1), Task::new("a", "clone", 2)];
        let mut mapping = SlotMap::new();
        let err = reconcile(&[], &new, &mut mapping, CapacityPolicy::Unbounded).unwrap_err();
        assert_eq!(err, ReconcileError::DuplicateId("a".into()));
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_update_then_insert_scenario() {
        // previous: task A incomplete at slot 0
        // new, sorted ascending: B (priority 1) first, A completed
        let previous = vec![Task::new("A", "write summary", 2)];
        let mut mapping = SlotMap::new();
        seed(&previous, &mut mapping, CapacityPolicy::Unbounded);

        let mut a_done = previous[0].clone();
        a_done.is_completed = true;
        let new = vec![Task::new("B", "review notes", 1), a_done.clone()];

        let ops = reconcile(&previous, &new, &mut mapping, CapacityPolicy::Unbounded).unwrap();
        assert_eq!(ops.len(), 2);
        match &ops[0] {
            SlotOp::Update { id, old, new } => {
                assert_eq!(id, "A");
                assert!(!old.is_completed);
                assert!(new.is_completed);
            }
            other => panic!("expected update, got {:?}", other),
        }
        assert_eq!(ops[1], SlotOp::Insert { id: "B".into(), slot: 1 });
        assert_eq!(mapping.slot_of("A"), Some(0));
    }

    #[test]
    fn test_op_id_accessor() {
        let op = SlotOp::Insert { id: "x".into(), slot: 7 };
        assert_eq!(op.id(), "x");
    }
}
