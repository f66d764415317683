use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::model::collection::TaskCollection;
use crate::model::slots::{CapacityPolicy, SlotMap};
use crate::model::task::Task;
use crate::ops::progress::is_collection_complete;
use crate::ops::reconcile::{ReconcileError, SlotOp, reconcile};
use crate::ops::sort::{SortOrder, sort_tasks};

/// Reconciliation state for one collection's rendering session.
///
/// Owns the slot table and the snapshot applied by the last successful
/// pass. Each `sync` runs to completion before the next is accepted —
/// callers share a session through the registry's per-collection mutex —
/// so two passes can never race for the same free slot.
#[derive(Debug)]
pub struct CollectionSession {
    collection_id: String,
    policy: CapacityPolicy,
    order: SortOrder,
    mapping: SlotMap,
    previous: Vec<Task>,
    version: u64,
}

impl CollectionSession {
    /// Start an empty session for a collection
    pub fn new(collection: &TaskCollection, order: SortOrder) -> Self {
        CollectionSession {
            collection_id: collection.id.clone(),
            policy: collection.capacity_policy(),
            order,
            mapping: SlotMap::new(),
            previous: Vec::new(),
            version: 0,
        }
    }

    /// Sort the authoritative snapshot with the active order, reconcile it
    /// against the retained previous snapshot, and commit. On error the
    /// session is unchanged: no snapshot is retained, the slot table is
    /// untouched, and the version does not move.
    pub fn sync(&mut self, tasks: &[Task]) -> Result<Vec<SlotOp>, ReconcileError> {
        let sorted = sort_tasks(tasks, self.order);
        let ops = reconcile(&self.previous, &sorted, &mut self.mapping, self.policy)?;
        self.previous = sorted;
        self.version += 1;
        tracing::debug!(
            collection = %self.collection_id,
            version = self.version,
            ops = ops.len(),
            "reconciled snapshot"
        );
        Ok(ops)
    }

    /// Change the order used by subsequent passes (selected in the UI).
    /// Tasks already on the board keep their slots; only newly inserted
    /// tasks see the new ordering.
    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    /// The id → slot table, for renderers resolving update targets
    pub fn mapping(&self) -> &SlotMap {
        &self.mapping
    }

    /// Snapshot applied by the last successful pass, in slot-sorted order
    pub fn tasks(&self) -> &[Task] {
        &self.previous
    }

    /// Bumped once per successful pass
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the board should play its completion animation
    pub fn is_complete(&self) -> bool {
        is_collection_complete(&self.previous, &self.mapping, self.policy)
    }
}

/// Per-collection session handles.
///
/// Each collection id maps to one mutexed session: passes against the
/// same collection serialize on its lock, while distinct collections
/// reconcile concurrently on disjoint slot tables.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<Mutex<CollectionSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    /// Get or create the session for a collection. `order` seeds a new
    /// session and is ignored for an existing one.
    pub fn session(
        &self,
        collection: &TaskCollection,
        order: SortOrder,
    ) -> Arc<Mutex<CollectionSession>> {
        let mut sessions = self.sessions.lock();
        sessions
            .entry(collection.id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(CollectionSession::new(collection, order))))
            .clone()
    }

    /// Drop a collection's session when its rendering surface closes.
    /// Returns whether a session existed.
    pub fn end_session(&self, collection_id: &str) -> bool {
        self.sessions.lock().remove(collection_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
