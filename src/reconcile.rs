//! Convergence loop over the backend's adjacent-swap primitive.
//!
//! The backend cannot set a priority directly; its only reordering mutation
//! is "move this timer one position". The loop steps in one direction and
//! watches the value the backend reports back, aborting on the first sign it
//! can no longer make progress.

use tracing::{debug, error};

use crate::transport::{PriorityTransport, StepDirection, TransportError};

/// Result of one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The timer reached (or moved past) the target.
    Converged { steps: u32 },
    /// The backend stopped moving the timer. The caller may retry the whole
    /// run after a fresh listing; this loop never does.
    Stalled { last_priority: u32, steps: u32 },
}

impl ReconcileOutcome {
    /// True when the timer ended up at its target.
    pub const fn is_converged(&self) -> bool {
        matches!(self, ReconcileOutcome::Converged { .. })
    }
}

/// Drive `id` from `current` toward `target` one adjacent swap at a time.
///
/// After each step the reported priority is checked, in order: reaching the
/// target converges; repeating the previous value stalls; in the `Higher`
/// direction a value below the target counts as convergence, because the
/// backend can move more than one effective rank near tier boundaries.
/// `ceiling` bounds the number of swap calls (the number of occupied slots
/// is a safe value) so an oscillating backend cannot loop forever. Transport
/// failures abort immediately and surface unchanged.
///
/// Every iteration is a remote mutation; the caller must rebuild its
/// snapshot from a fresh listing once the run finishes.
pub fn reconcile<T: PriorityTransport>(
    transport: &mut T,
    id: u32,
    current: u32,
    target: u32,
    ceiling: u32,
) -> Result<ReconcileOutcome, TransportError> {
    if current == target {
        return Ok(ReconcileOutcome::Converged { steps: 0 });
    }

    // Priority 1 is the highest precedence, so "higher" means a smaller value.
    let direction = if target < current {
        StepDirection::Higher
    } else {
        StepDirection::Lower
    };

    let mut previous = current;
    let mut steps = 0u32;
    loop {
        let step = transport.step_priority(id, direction)?;
        steps += 1;
        let priority = step.priority;

        if priority == target {
            debug!(id, priority, steps, "priority converged");
            return Ok(ReconcileOutcome::Converged { steps });
        }
        if priority == previous {
            error!(id, priority, target, "priority did not swap");
            return Ok(ReconcileOutcome::Stalled {
                last_priority: priority,
                steps,
            });
        }
        if direction == StepDirection::Higher && priority < target {
            debug!(id, priority, target, steps, "moved past target");
            return Ok(ReconcileOutcome::Converged { steps });
        }
        if steps >= ceiling {
            error!(id, priority, target, steps, "no convergence within step ceiling");
            return Ok(ReconcileOutcome::Stalled {
                last_priority: priority,
                steps,
            });
        }
        previous = priority;
    }
}
