//! Recurring timer records as reported by the backend scheduler.

use serde::{Deserialize, Serialize};

/// Priority values at or above this threshold mark timers the backend has
/// deliberately excluded from prioritized contention. They never appear in
/// a [`PrioritySnapshot`](crate::snapshot::PrioritySnapshot).
pub const EXCLUDED_PRIORITY_MIN: u32 = 500_000;

/// One recurring recording rule as delivered by a listing call.
///
/// The listing order reflects the backend's contention ranking at the time
/// of the call; a lower `priority` value records earlier during conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringTimer {
    pub id: u32,
    pub priority: u32,
    pub name: String,
}

impl RecurringTimer {
    /// Construct a record from its backend fields.
    pub fn new(id: u32, priority: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            priority,
            name: name.into(),
        }
    }

    /// True when the backend keeps this timer out of prioritized contention.
    pub fn is_excluded(&self) -> bool {
        self.priority >= EXCLUDED_PRIORITY_MIN
    }
}
