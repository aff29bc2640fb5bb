//! Remote operations the reconciliation core drives on the backend client.
//!
//! The backend offers exactly two priority primitives: read the full ordered
//! list and move one named timer a single adjacent position. Wire encoding
//! and HTTP plumbing belong to the transport implementation, not to this
//! crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timer::RecurringTimer;

/// Direction of a single-step priority move.
///
/// `Higher` moves toward higher precedence, which is the numerically lower
/// priority value; `Lower` moves toward the end of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepDirection {
    Higher,
    Lower,
}

impl StepDirection {
    /// Keyword the backend expects in a step request.
    pub const fn as_str(self) -> &'static str {
        match self {
            StepDirection::Higher => "higher",
            StepDirection::Lower => "lower",
        }
    }
}

/// Backend response to a single step request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityStep {
    pub id: u32,
    /// Priority value the timer holds after the step.
    pub priority: u32,
}

/// Failures surfaced by the transport collaborator.
///
/// The core never retries these; retry policy, if any, belongs to the
/// transport itself.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The backend could not be reached or rejected the request.
    #[error("backend request failed: {0}")]
    Request(String),
    /// The backend answered with a response the client could not parse.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

/// The two remote operations the reconciliation core consumes.
///
/// Every call is a blocking round-trip; implementations report the backend's
/// view after the call, never a locally predicted one.
pub trait PriorityTransport {
    /// Fetch the ordered recurring timer list.
    fn list_recurring(&mut self) -> Result<Vec<RecurringTimer>, TransportError>;

    /// Move one timer a single adjacent position and report its new value.
    fn step_priority(
        &mut self,
        id: u32,
        direction: StepDirection,
    ) -> Result<PriorityStep, TransportError>;
}
