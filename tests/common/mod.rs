#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use study_scheduler::{MemoryState, Phase, Rating, Scheduler};

pub const FIXED_TIMESTAMP: i64 = 1_700_000_000;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_opt(FIXED_TIMESTAMP, 0).unwrap()
}

/// Reviews each rating exactly when it falls due, starting from `start`.
pub fn replay(
    scheduler: &Scheduler,
    start: Option<MemoryState>,
    ratings: &[Rating],
) -> Vec<MemoryState> {
    let mut now = fixed_now();
    let mut state = start;
    let mut history = Vec::with_capacity(ratings.len());
    for &rating in ratings {
        let elapsed = state.as_ref().map(|s| f64::from(s.interval_days()));
        now += chrono::Duration::days(elapsed.unwrap_or(0.0) as i64);
        let outcome = scheduler.schedule(rating, state.as_ref(), elapsed, now);
        history.push(outcome.state.clone());
        state = Some(outcome.state);
    }
    history
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

pub fn arb_rating() -> impl Strategy<Value = Rating> {
    prop_oneof![
        Just(Rating::Fail),
        Just(Rating::Hard),
        Just(Rating::Good),
        Just(Rating::Easy),
    ]
}

pub fn arb_phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::New),
        Just(Phase::Learning),
        Just(Phase::Review),
        Just(Phase::Relearning),
    ]
}

/// Persisted states including garbage a corrupted row could hold.
pub fn arb_memory_state() -> impl Strategy<Value = MemoryState> {
    (
        prop_oneof![Just(0.0), Just(f64::NAN), -1e6f64..1e6f64, 0.0f64..500.0f64],
        prop_oneof![Just(0.0), Just(f64::INFINITY), -1e6f64..1e6f64, 1.0f64..10.0f64],
        arb_phase(),
        0u32..100_000u32,
        0u32..50u32,
    )
        .prop_map(|(stability, difficulty, phase, interval, lapses)| {
            MemoryState::restore(stability, difficulty, phase, interval, lapses, None)
        })
}

pub fn arb_elapsed() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        Just(Some(-5.0)),
        Just(Some(f64::NAN)),
        (0.0f64..3650.0f64).prop_map(Some),
    ]
}
