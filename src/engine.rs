//! Snapshot ownership and the serialized placement path.
//!
//! The engine owns the transport and the published snapshot. Refreshes are
//! build-then-publish: a complete snapshot is assembled off to the side and
//! swapped in wholesale, so readers never observe a partially built index.
//! Edits funnel through the transport lock, so two editors can never race
//! the same swap chain.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::placement::{self, Placement};
use crate::reconcile::{self, ReconcileOutcome};
use crate::snapshot::PrioritySnapshot;
use crate::tier::Selection;
use crate::transport::{PriorityTransport, TransportError};

/// Outcome of a one-call [`place`](PriorityEngine::place) operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The request resolved to no change, or no snapshot was available.
    Unchanged,
    /// The owner is not in the published snapshot (typically a timer that
    /// has not been saved yet). The caller must save it first and then
    /// reconcile with the priority the backend reports back.
    UnknownOwner { target: u32 },
    /// A reconciliation ran against the backend; the snapshot has been
    /// invalidated and must be refreshed before the next placement.
    Moved {
        target: u32,
        outcome: ReconcileOutcome,
    },
}

/// Client-side engine pairing one backend transport with the current
/// priority snapshot.
pub struct PriorityEngine<T> {
    transport: Mutex<T>,
    published: Mutex<Option<Arc<PrioritySnapshot>>>,
}

impl<T: PriorityTransport> PriorityEngine<T> {
    /// Wrap a transport with no snapshot published yet.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Mutex::new(transport),
            published: Mutex::new(None),
        }
    }

    /// Fetch a fresh listing and publish a rebuilt snapshot wholesale.
    ///
    /// On failure the previously published snapshot is dropped, so no
    /// placement decision can be made against stale data.
    pub fn refresh(&self) -> Result<Arc<PrioritySnapshot>, TransportError> {
        let records = match self.transport.lock().list_recurring() {
            Ok(records) => records,
            Err(error) => {
                self.invalidate();
                return Err(error);
            }
        };
        let snapshot = Arc::new(PrioritySnapshot::build(&records));
        *self.published.lock() = Some(snapshot.clone());
        debug!(slots = snapshot.len(), "published priority snapshot");
        Ok(snapshot)
    }

    /// Latest published snapshot, if a refresh has succeeded since the last
    /// reconciliation.
    pub fn snapshot(&self) -> Option<Arc<PrioritySnapshot>> {
        self.published.lock().clone()
    }

    /// Resolve a placement request against the published snapshot.
    ///
    /// Without a snapshot no placement is attempted and the request resolves
    /// to no change.
    pub fn resolve(&self, selection: Selection, owner_id: u32) -> Placement {
        match self.snapshot() {
            Some(snapshot) => placement::resolve(&snapshot, selection, owner_id),
            None => {
                warn!(owner_id, "no snapshot available, leaving priority unchanged");
                Placement::Stay
            }
        }
    }

    /// Drive one timer from `current` to `target` through the step-swap
    /// primitive.
    ///
    /// Any attempted swap leaves the backend ordering unknown, so the
    /// published snapshot is invalidated whether the run converges, stalls,
    /// or fails.
    pub fn reconcile(
        &self,
        id: u32,
        current: u32,
        target: u32,
    ) -> Result<ReconcileOutcome, TransportError> {
        if current == target {
            return Ok(ReconcileOutcome::Converged { steps: 0 });
        }
        let slots = self.snapshot().map(|snapshot| snapshot.len() as u32);
        let ceiling = slots.unwrap_or(0).max(current.abs_diff(target)) + 1;
        let mut transport = self.transport.lock();
        let outcome = reconcile::reconcile(&mut *transport, id, current, target, ceiling);
        self.invalidate();
        outcome
    }

    /// Resolve a placement and, when a move is required, reconcile it in one
    /// call.
    pub fn place(&self, owner_id: u32, selection: Selection) -> Result<PlaceOutcome, TransportError> {
        let Some(snapshot) = self.snapshot() else {
            warn!(owner_id, "no snapshot available, placement skipped");
            return Ok(PlaceOutcome::Unchanged);
        };
        let Placement::Move { target } = placement::resolve(&snapshot, selection, owner_id) else {
            return Ok(PlaceOutcome::Unchanged);
        };
        let Some(current) = snapshot.owner_priority(owner_id) else {
            debug!(owner_id, target, "owner not in snapshot, deferring to caller");
            return Ok(PlaceOutcome::UnknownOwner { target });
        };
        if current == target {
            return Ok(PlaceOutcome::Unchanged);
        }
        let outcome = self.reconcile(owner_id, current, target)?;
        Ok(PlaceOutcome::Moved { target, outcome })
    }

    fn invalidate(&self) {
        if self.published.lock().take().is_some() {
            debug!("priority snapshot invalidated");
        }
    }
}
