//! Priority tiering and reconciliation for recurring DVR recording rules.
//!
//! The backend scheduler stores one integer priority per recurring timer and
//! offers only two priority primitives: list the ordered rules and move one
//! rule a single adjacent position. This crate classifies the flat ordering
//! into user-facing tiers, resolves minimal-disruption placement targets,
//! and drives the step primitive until a rule reaches its target.

pub mod engine;
pub mod gap;
pub mod placement;
pub mod reconcile;
pub mod snapshot;
pub mod tier;
pub mod timer;
pub mod transport;

pub use engine::{PlaceOutcome, PriorityEngine};
pub use placement::Placement;
pub use reconcile::ReconcileOutcome;
pub use snapshot::{PriorityOption, PrioritySnapshot, SlotEntry};
pub use tier::{Selection, Tier, TierTable};
pub use timer::{RecurringTimer, EXCLUDED_PRIORITY_MIN};
pub use transport::{PriorityStep, PriorityTransport, StepDirection, TransportError};
