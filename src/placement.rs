//! Placement resolution: mapping a selection to a minimal-change target.
//!
//! The resolver is pure over one snapshot. "Not found" and "no-op" are
//! ordinary outcomes, never errors, and every non-trivial numeric target is
//! run through the gap search so an existing hole is preferred over a long
//! swap chain.

use tracing::debug;

use crate::gap::search_gap;
use crate::snapshot::PrioritySnapshot;
use crate::tier::{Selection, Tier};

/// Outcome of resolving a placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The current priority already satisfies the request.
    Stay,
    /// The timer should end up at `target`.
    Move { target: u32 },
}

impl Placement {
    /// True when a remote reconciliation pass is required.
    pub const fn requires_move(self) -> bool {
        matches!(self, Placement::Move { .. })
    }

    /// Resolved target priority value, if any.
    pub const fn target(self) -> Option<u32> {
        match self {
            Placement::Stay => None,
            Placement::Move { target } => Some(target),
        }
    }
}

/// Resolve a placement request for the timer identified by `owner_id`.
pub fn resolve(snapshot: &PrioritySnapshot, selection: Selection, owner_id: u32) -> Placement {
    match selection {
        Selection::Default => Placement::Stay,
        Selection::Before(priority) => resolve_before(snapshot, priority, owner_id),
        Selection::Tier(tier) => resolve_tier(snapshot, tier, owner_id),
    }
}

/// Insert immediately before the timer currently holding `selected`.
fn resolve_before(snapshot: &PrioritySnapshot, selected: u32, owner_id: u32) -> Placement {
    let Some(occupant) = snapshot.get(selected) else {
        // The chosen neighbor disappeared between listing and edit.
        debug!(selected, owner_id, "selected priority not found");
        return Placement::Stay;
    };
    if occupant.owner_id == owner_id {
        // Re-selecting your own current slot is a no-op.
        return Placement::Stay;
    }
    if selected <= 1 {
        // Taking over the front of the list when priority 1 exists.
        return Placement::Move { target: 1 };
    }
    Placement::Move {
        target: search_gap(snapshot, selected - 1),
    }
}

/// Move to the start of `tier` (or the end of the list for Unimportant).
fn resolve_tier(snapshot: &PrioritySnapshot, tier: Tier, owner_id: u32) -> Placement {
    match snapshot.owner_entry(owner_id) {
        Some((_, entry)) if entry.tier == tier => {
            // Already a member of the requested tier.
            return Placement::Stay;
        }
        Some(_) => {}
        None if tier == Tier::Unimportant => {
            // Timers not yet in the snapshot append at the end anyway.
            return Placement::Stay;
        }
        None => {}
    }

    let Some(anchor) = snapshot.anchor(tier) else {
        // Not enough timers to form the tier; leave the backend default.
        debug!(%tier, owner_id, "tier has no members, keeping priority");
        return Placement::Stay;
    };

    let raw = match tier {
        Tier::Important => {
            if anchor > 1 {
                // Free slots above the front of the list.
                return Placement::Move { target: anchor - 1 };
            }
            1
        }
        Tier::Unimportant => snapshot.max_priority().unwrap_or(anchor),
        Tier::High | Tier::Normal | Tier::Low => {
            let floor = tier
                .more_important()
                .and_then(|above| snapshot.anchor(above))
                .unwrap_or(0);
            // Look for a hole between the previous tier's start and ours.
            for value in (floor + 1..anchor).rev() {
                if !snapshot.contains(value) {
                    return Placement::Move {
                        target: search_gap(snapshot, value),
                    };
                }
            }
            anchor
        }
    };

    Placement::Move {
        target: search_gap(snapshot, raw),
    }
}
