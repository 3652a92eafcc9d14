//! Shared snapshot state
//!
//! The store holds the one snapshot consumers read. Replacement is a
//! single channel send, so readers never observe a partially built
//! snapshot, and ordering between aggregation cycles goes by the id
//! assigned when the cycle *started*: a slow cycle that settles after a
//! newer one has published is discarded instead of rolling the state
//! back.

use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

use crate::models::Snapshot;

#[derive(Debug)]
struct CycleState {
    next_id: u64,
    last_applied: u64,
}

/// Holder of the current snapshot plus the cycle ordering state.
///
/// Mutated only by the aggregation loop; consumers get read-only access
/// through [`SnapshotStore::latest`] and [`SnapshotStore::subscribe`].
pub struct SnapshotStore {
    tx: watch::Sender<Option<Arc<Snapshot>>>,
    state: Mutex<CycleState>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx,
            state: Mutex::new(CycleState {
                next_id: 1,
                last_applied: 0,
            }),
        }
    }

    /// Reserve the id for a cycle that is starting now.
    pub fn begin_cycle(&self) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        id
    }

    /// Install the result of `cycle` unless a newer cycle already
    /// published. Returns whether the snapshot was installed.
    pub fn publish(&self, cycle: u64, snapshot: Snapshot) -> bool {
        let mut state = self.state.lock().unwrap();
        if cycle < state.last_applied {
            debug!(
                cycle,
                last_applied = state.last_applied,
                "discarding stale cycle result"
            );
            return false;
        }
        state.last_applied = cycle;
        self.tx.send_replace(Some(Arc::new(snapshot)));
        true
    }

    /// Latest snapshot; `None` only before the first cycle completes.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.tx.borrow().clone()
    }

    /// Receiver that wakes whenever the snapshot is replaced, so
    /// consumers can refresh without polling.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
