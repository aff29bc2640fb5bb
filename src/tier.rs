//! Priority tiers and placement selections.
//!
//! Tiers are coarse, user-facing priority classes assigned by ordinal rank in
//! the backend listing, not by raw priority magnitude. [`Selection`] is the
//! closed set of placement requests a front-end can issue for a timer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// User-facing priority classes ordered from most to least important.
///
/// The ordering is stable so the resolver and snapshot builder can rely on
/// integer indexes instead of branching on specific labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Important,
    High,
    Normal,
    Low,
    Unimportant,
}

impl Tier {
    /// Ordered list of all tiers (most important first) for iteration utilities.
    pub const ALL: [Tier; 5] = [
        Tier::Important,
        Tier::High,
        Tier::Normal,
        Tier::Low,
        Tier::Unimportant,
    ];

    /// Stable index for tier based arrays.
    pub const fn index(self) -> usize {
        match self {
            Tier::Important => 0,
            Tier::High => 1,
            Tier::Normal => 2,
            Tier::Low => 3,
            Tier::Unimportant => 4,
        }
    }

    /// Label used by the front-end priority dropdown.
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Important => "Important",
            Tier::High => "High",
            Tier::Normal => "Normal",
            Tier::Low => "Low",
            Tier::Unimportant => "Unimportant",
        }
    }

    /// The adjacent tier with higher importance, if any.
    pub const fn more_important(self) -> Option<Tier> {
        match self {
            Tier::Important => None,
            Tier::High => Some(Tier::Important),
            Tier::Normal => Some(Tier::High),
            Tier::Low => Some(Tier::Normal),
            Tier::Unimportant => Some(Tier::Low),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Important => "important",
            Tier::High => "high",
            Tier::Normal => "normal",
            Tier::Low => "low",
            Tier::Unimportant => "unimportant",
        };
        write!(f, "{label}")
    }
}

/// A placement request issued by the front-end for one timer.
///
/// Replaces the numeric sentinel scheme of older clients: every branch the
/// resolver must handle is a distinct variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Leave the priority unchanged.
    Default,
    /// Move to the start of the given tier (end of the list for
    /// [`Tier::Unimportant`]).
    Tier(Tier),
    /// Insert immediately before the timer currently holding this priority
    /// value.
    Before(u32),
}

/// Helper structure wrapping a value per [`Tier`].
///
/// As long as [`Tier::ALL`] stays in sync with the enum, the table grows
/// automatically and call sites iterate dynamically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable<T> {
    values: Vec<T>,
}

impl<T> TierTable<T> {
    /// Build a table by executing a closure for each tier in [`Tier::ALL`]
    /// order.
    pub fn from_fn(mut f: impl FnMut(Tier) -> T) -> Self {
        let mut values = Vec::with_capacity(Tier::ALL.len());
        for tier in Tier::ALL {
            values.push(f(tier));
        }
        TierTable { values }
    }

    /// Borrow the value for a given tier.
    pub fn get(&self, tier: Tier) -> &T {
        &self.values[tier.index()]
    }

    /// Mutably borrow the value for a given tier.
    pub fn get_mut(&mut self, tier: Tier) -> &mut T {
        &mut self.values[tier.index()]
    }
}

impl<T> Index<Tier> for TierTable<T> {
    type Output = T;

    fn index(&self, index: Tier) -> &Self::Output {
        self.get(index)
    }
}

impl<T> IndexMut<Tier> for TierTable<T> {
    fn index_mut(&mut self, index: Tier) -> &mut Self::Output {
        self.get_mut(index)
    }
}
