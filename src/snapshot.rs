//! Point-in-time snapshot of the backend's priority ordering.
//!
//! A snapshot is built wholesale from one listing call and never mutated in
//! place. It becomes stale the instant any remote swap succeeds; callers must
//! rebuild it from a fresh listing before trusting it again.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::tier::{Selection, Tier, TierTable};
use crate::timer::RecurringTimer;

/// Identity and classification of the timer occupying one priority value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    /// Backend id of the owning recurring timer.
    pub owner_id: u32,
    /// Tier assigned by ordinal rank within the snapshot.
    pub tier: Tier,
    /// Display string for the front-end dropdown, `"{priority} [{name}]"`.
    pub label: String,
}

/// One entry of the priority dropdown offered to the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityOption {
    pub selection: Selection,
    pub label: String,
}

/// Immutable index from occupied priority values to their owners.
///
/// The key set is exactly the set of non-excluded priority values observed in
/// the listing. Iteration order is ascending priority value, which is also
/// the tie-break order for first-seen bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrioritySnapshot {
    slots: BTreeMap<u32, SlotEntry>,
    /// Priority value of the first member seen per tier, where observed.
    anchors: TierTable<Option<u32>>,
    max_priority: Option<u32>,
    duplicates_dropped: usize,
}

impl PrioritySnapshot {
    /// Build a snapshot from one freshly fetched listing.
    ///
    /// Records in the excluded range are skipped. When two records report the
    /// same priority value the first one in ascending scan order wins; later
    /// ones are dropped and counted in [`duplicates_dropped`](Self::duplicates_dropped).
    /// No remote calls are made.
    pub fn build(records: &[RecurringTimer]) -> Self {
        let mut ordered: BTreeMap<u32, (u32, &str)> = BTreeMap::new();
        let mut duplicates_dropped = 0;
        for record in records {
            if record.is_excluded() {
                debug!(
                    id = record.id,
                    priority = record.priority,
                    name = %record.name,
                    "skipping timer in the excluded priority range"
                );
                continue;
            }
            match ordered.entry(record.priority) {
                Entry::Occupied(_) => {
                    duplicates_dropped += 1;
                    warn!(
                        id = record.id,
                        priority = record.priority,
                        "duplicate priority value in listing, keeping first entry"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert((record.id, record.name.as_str()));
                }
            }
        }

        let retained = ordered.len();
        let mut slots = BTreeMap::new();
        let mut anchors = TierTable::from_fn(|_| None);
        for (rank, (priority, (owner_id, name))) in ordered.iter().enumerate() {
            let tier = tier_for_rank(rank, retained);
            if anchors[tier].is_none() {
                anchors[tier] = Some(*priority);
            }
            slots.insert(
                *priority,
                SlotEntry {
                    owner_id: *owner_id,
                    tier,
                    label: format!("{priority} [{name}]"),
                },
            );
        }

        let max_priority = slots.last_key_value().map(|(priority, _)| *priority);
        Self {
            slots,
            anchors,
            max_priority,
            duplicates_dropped,
        }
    }

    /// Number of occupied priority values.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the listing held no prioritized recurring timers.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entry occupying the given priority value, if any.
    pub fn get(&self, priority: u32) -> Option<&SlotEntry> {
        self.slots.get(&priority)
    }

    /// True when the given priority value is occupied.
    pub fn contains(&self, priority: u32) -> bool {
        self.slots.contains_key(&priority)
    }

    /// Priority value and entry of the timer owned by `owner_id`, if present.
    pub fn owner_entry(&self, owner_id: u32) -> Option<(u32, &SlotEntry)> {
        self.slots
            .iter()
            .find(|(_, entry)| entry.owner_id == owner_id)
            .map(|(priority, entry)| (*priority, entry))
    }

    /// Current priority value of the timer owned by `owner_id`, if present.
    pub fn owner_priority(&self, owner_id: u32) -> Option<u32> {
        self.owner_entry(owner_id).map(|(priority, _)| priority)
    }

    /// Priority value of the first member seen in the given tier.
    pub fn anchor(&self, tier: Tier) -> Option<u32> {
        self.anchors[tier]
    }

    /// Highest occupied priority value (the end of the list).
    pub fn max_priority(&self) -> Option<u32> {
        self.max_priority
    }

    /// Listing records dropped because their priority value was already taken.
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// Ascending iterator over occupied priority values and their entries.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &SlotEntry)> + '_ {
        self.slots.iter().map(|(priority, entry)| (*priority, entry))
    }

    /// Assemble the front-end priority dropdown.
    ///
    /// The list opens with the default and the four addressable tiers, then
    /// one entry per occupied priority value in ascending order, and closes
    /// with the unimportant tier.
    pub fn priority_options(&self) -> Vec<PriorityOption> {
        let mut options = Vec::with_capacity(self.slots.len() + Tier::ALL.len() + 1);
        options.push(PriorityOption {
            selection: Selection::Default,
            label: "Default".to_string(),
        });
        for tier in [Tier::Important, Tier::High, Tier::Normal, Tier::Low] {
            options.push(PriorityOption {
                selection: Selection::Tier(tier),
                label: tier.label().to_string(),
            });
        }
        for (priority, entry) in self.iter() {
            options.push(PriorityOption {
                selection: Selection::Before(priority),
                label: entry.label.clone(),
            });
        }
        options.push(PriorityOption {
            selection: Selection::Tier(Tier::Unimportant),
            label: Tier::Unimportant.label().to_string(),
        });
        options
    }
}

/// Tier for ordinal rank `rank` among `retained` records.
///
/// The first record is always Important; the last is Unimportant once at
/// least four records exist; everything in between splits into three
/// contiguous groups by rank.
fn tier_for_rank(rank: usize, retained: usize) -> Tier {
    if rank == 0 {
        Tier::Important
    } else if rank == retained - 1 && retained >= 4 {
        Tier::Unimportant
    } else {
        match 3 * rank / retained {
            0 => Tier::High,
            1 => Tier::Normal,
            _ => Tier::Low,
        }
    }
}
