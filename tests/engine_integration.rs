// Integration tests driving the engine against a simulated backend that
// reorders timers the way the real scheduler does: one adjacent swap of
// priority values per step request.

use recurring_priority::{
    PlaceOutcome, Placement, PriorityEngine, PrioritySnapshot, PriorityStep, PriorityTransport,
    ReconcileOutcome, RecurringTimer, Selection, StepDirection, Tier, TransportError,
};

/// In-memory backend holding recurring timers ordered by priority value.
///
/// A step request swaps the priority values of the named timer and its
/// neighbor in ranking order; at either end of the list the timer is
/// reported unchanged, which the engine must treat as a stall.
struct SimulatedBackend {
    timers: Vec<RecurringTimer>,
    fail_next_list: bool,
    fail_steps: bool,
}

impl SimulatedBackend {
    fn new(entries: &[(u32, u32, &str)]) -> Self {
        let mut timers: Vec<RecurringTimer> = entries
            .iter()
            .map(|(id, priority, name)| RecurringTimer::new(*id, *priority, *name))
            .collect();
        timers.sort_by_key(|timer| timer.priority);
        Self {
            timers,
            fail_next_list: false,
            fail_steps: false,
        }
    }
}

impl PriorityTransport for SimulatedBackend {
    fn list_recurring(&mut self) -> Result<Vec<RecurringTimer>, TransportError> {
        if self.fail_next_list {
            self.fail_next_list = false;
            return Err(TransportError::Request("connection refused".to_string()));
        }
        Ok(self.timers.clone())
    }

    fn step_priority(
        &mut self,
        id: u32,
        direction: StepDirection,
    ) -> Result<PriorityStep, TransportError> {
        if self.fail_steps {
            return Err(TransportError::Request("connection refused".to_string()));
        }
        let position = self
            .timers
            .iter()
            .position(|timer| timer.id == id)
            .expect("step for unknown timer id");
        let neighbor = match direction {
            StepDirection::Higher if position > 0 => position - 1,
            StepDirection::Lower if position + 1 < self.timers.len() => position + 1,
            _ => {
                // End of the list: the backend reports the timer unchanged.
                return Ok(PriorityStep {
                    id,
                    priority: self.timers[position].priority,
                });
            }
        };
        let own = self.timers[position].priority;
        let other = self.timers[neighbor].priority;
        self.timers[position].priority = other;
        self.timers[neighbor].priority = own;
        self.timers.sort_by_key(|timer| timer.priority);
        Ok(PriorityStep {
            id,
            priority: other,
        })
    }
}

fn dense_backend() -> SimulatedBackend {
    SimulatedBackend::new(&[
        (1, 1, "News"),
        (2, 2, "Movie Night"),
        (3, 3, "Cartoons"),
        (4, 4, "Documentary"),
        (5, 5, "Late Show"),
    ])
}

#[test]
fn place_moves_a_timer_to_the_front() {
    let engine = PriorityEngine::new(dense_backend());
    engine.refresh().unwrap();

    let outcome = engine.place(4, Selection::Tier(Tier::Important)).unwrap();
    assert_eq!(
        outcome,
        PlaceOutcome::Moved {
            target: 1,
            outcome: ReconcileOutcome::Converged { steps: 3 },
        }
    );

    // The snapshot is stale after the swaps and must be rebuilt.
    assert!(engine.snapshot().is_none());
    let snapshot = engine.refresh().unwrap();
    assert_eq!(snapshot.get(1).unwrap().owner_id, 4);
    assert_eq!(snapshot.get(1).unwrap().tier, Tier::Important);
}

#[test]
fn place_moves_a_timer_toward_the_end() {
    let engine = PriorityEngine::new(dense_backend());
    engine.refresh().unwrap();

    let outcome = engine.place(1, Selection::Tier(Tier::Unimportant)).unwrap();
    assert_eq!(
        outcome,
        PlaceOutcome::Moved {
            target: 5,
            outcome: ReconcileOutcome::Converged { steps: 4 },
        }
    );

    let snapshot = engine.refresh().unwrap();
    assert_eq!(snapshot.get(5).unwrap().owner_id, 1);
    assert_eq!(snapshot.get(5).unwrap().tier, Tier::Unimportant);
}

#[test]
fn place_before_a_gap_overshoots_into_the_hole() {
    // 4..9 free below the timer at 10: the resolver settles on the hole at 7
    // and the first two swaps carry the timer straight past it.
    let engine = PriorityEngine::new(SimulatedBackend::new(&[
        (1, 1, "News"),
        (2, 2, "Movie Night"),
        (3, 3, "Cartoons"),
        (4, 10, "Documentary"),
        (5, 11, "Late Show"),
    ]));
    engine.refresh().unwrap();

    let outcome = engine.place(5, Selection::Before(10)).unwrap();
    assert_eq!(
        outcome,
        PlaceOutcome::Moved {
            target: 7,
            outcome: ReconcileOutcome::Converged { steps: 2 },
        }
    );

    let snapshot = engine.refresh().unwrap();
    // The moved timer now ranks above its old neighbor.
    let moved = snapshot.owner_priority(5).unwrap();
    let neighbor = snapshot.owner_priority(4).unwrap();
    assert!(moved < neighbor);
}

#[test]
fn placement_requests_without_a_snapshot_are_skipped() {
    let engine = PriorityEngine::new(dense_backend());
    assert_eq!(
        engine.resolve(Selection::Tier(Tier::Important), 3),
        Placement::Stay
    );
    assert_eq!(
        engine.place(3, Selection::Tier(Tier::Important)).unwrap(),
        PlaceOutcome::Unchanged
    );
}

#[test]
fn unknown_owner_defers_reconciliation_to_the_caller() {
    let engine = PriorityEngine::new(dense_backend());
    engine.refresh().unwrap();

    let outcome = engine.place(99, Selection::Before(3)).unwrap();
    assert_eq!(outcome, PlaceOutcome::UnknownOwner { target: 2 });
    // No swap ran, so the snapshot stays valid.
    assert!(engine.snapshot().is_some());
}

#[test]
fn listing_failure_clears_the_published_snapshot() {
    let mut backend = dense_backend();
    backend.fail_next_list = true;
    let engine = PriorityEngine::new(backend);
    assert!(engine.refresh().is_err());
    assert!(engine.snapshot().is_none());

    // The next successful listing publishes again.
    let snapshot = engine.refresh().unwrap();
    assert_eq!(snapshot.len(), 5);
}

#[test]
fn step_failure_surfaces_and_invalidates() {
    let mut backend = dense_backend();
    backend.fail_steps = true;
    let engine = PriorityEngine::new(backend);
    engine.refresh().unwrap();

    let result = engine.place(4, Selection::Tier(Tier::Important));
    assert!(result.is_err());
    assert!(engine.snapshot().is_none());
}

#[test]
fn moving_past_the_front_stalls_instead_of_looping() {
    // Ask the timer already ranked first to move even higher: every step
    // reports it unchanged.
    let engine = PriorityEngine::new(SimulatedBackend::new(&[
        (1, 3, "News"),
        (2, 4, "Movie Night"),
        (3, 5, "Cartoons"),
        (4, 6, "Documentary"),
        (5, 7, "Late Show"),
    ]));
    engine.refresh().unwrap();

    let outcome = engine.reconcile(1, 3, 2).unwrap();
    assert_eq!(
        outcome,
        ReconcileOutcome::Stalled {
            last_priority: 3,
            steps: 1
        }
    );
    assert!(engine.snapshot().is_none());
}

#[test]
fn snapshot_builds_from_a_serialized_listing() {
    let fixture = r#"[
        {"id": 11, "priority": 1, "name": "News"},
        {"id": 12, "priority": 2, "name": "Movie Night"},
        {"id": 13, "priority": 500001, "name": "Parked"},
        {"id": 14, "priority": 3, "name": "Cartoons"},
        {"id": 15, "priority": 4, "name": "Documentary"}
    ]"#;
    let records: Vec<RecurringTimer> = serde_json::from_str(fixture).unwrap();
    let snapshot = PrioritySnapshot::build(&records);
    assert_eq!(snapshot.len(), 4);
    assert!(!snapshot.contains(500_001));
    assert_eq!(snapshot.get(1).unwrap().tier, Tier::Important);
    assert_eq!(snapshot.get(4).unwrap().tier, Tier::Unimportant);
}

#[test]
fn priority_options_follow_the_listing() {
    let engine = PriorityEngine::new(dense_backend());
    let snapshot = engine.refresh().unwrap();
    let options = snapshot.priority_options();
    // Default, four tiers, five occupied values, Unimportant.
    assert_eq!(options.len(), 11);
    assert_eq!(options[5].label, "1 [News]");
    assert_eq!(options[6].label, "2 [Movie Night]");
}
