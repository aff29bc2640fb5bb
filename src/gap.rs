//! Backward search for a nearby unoccupied priority slot.
//!
//! Inserting into an existing hole costs zero remote swaps, so the resolver
//! prefers a gap just below its raw target. Only half the distance to the
//! gap is consumed, keeping free slots in reserve for future inserts.

use crate::snapshot::PrioritySnapshot;

/// Find the best slot to request for an insertion at `start`.
///
/// Walks from `start - 1` toward 1 while values are unoccupied, remembering
/// the lowest contiguous free value found. With a gap in range the returned
/// value sits halfway between the gap and `start`; a gap at distance one
/// rounds back to `start` itself. Without a gap `start` is returned
/// unchanged. Pure index lookup and arithmetic, no remote calls.
pub fn search_gap(snapshot: &PrioritySnapshot, start: u32) -> u32 {
    let mut lowest_free = start;
    for value in (1..start).rev() {
        if snapshot.contains(value) {
            break;
        }
        lowest_free = value;
    }
    if lowest_free < start {
        lowest_free + (start - lowest_free + 1) / 2
    } else {
        start
    }
}
