//! Property-based tests for the scheduler invariants:
//! - lapse count never decreases
//! - interval within [1, maximum] once a card leaves `New`
//! - difficulty within the configured bounds
//! - empty weights behave exactly like the default weights
//! - identical inputs serialize to identical outputs

mod common;

use proptest::prelude::*;

use common::{arb_elapsed, arb_memory_state, arb_rating, fixed_now, replay};
use study_scheduler::{
    schedule, ConfigOverride, Phase, Scheduler, SchedulerConfig, DEFAULT_WEIGHTS,
};

proptest! {
    #[test]
    fn lapse_count_never_decreases(
        start in proptest::option::of(arb_memory_state()),
        ratings in proptest::collection::vec(arb_rating(), 1..40),
    ) {
        let scheduler = Scheduler::default();
        let mut previous = start.as_ref().map(|s| s.lapse_count()).unwrap_or(0);
        for state in replay(&scheduler, start, &ratings) {
            prop_assert!(state.lapse_count() >= previous);
            previous = state.lapse_count();
        }
    }

    #[test]
    fn interval_stays_within_floor_and_ceiling(
        rating in arb_rating(),
        state in arb_memory_state(),
        elapsed in arb_elapsed(),
        max_days in prop_oneof![Just(36500u32), 1u32..400u32],
    ) {
        let scheduler = Scheduler::new(SchedulerConfig {
            maximum_interval_days: max_days,
            ..Default::default()
        });
        let outcome = scheduler.schedule(rating, Some(&state), elapsed, fixed_now());
        prop_assert_ne!(outcome.state.phase(), Phase::New);
        prop_assert!(outcome.interval_days() >= 1);
        prop_assert!(outcome.interval_days() <= max_days);
        prop_assert!(outcome.state.stability() > 0.0);
        prop_assert!(outcome.state.stability().is_finite());
        prop_assert!((0.0..=1.0).contains(&outcome.retrievability));
    }

    #[test]
    fn difficulty_within_bounds(
        rating in arb_rating(),
        state in arb_memory_state(),
        elapsed in arb_elapsed(),
        (min, width) in (0.0f64..5.0f64, 0.5f64..20.0f64),
    ) {
        let scheduler = Scheduler::new(SchedulerConfig {
            difficulty_min: min,
            difficulty_max: min + width,
            ..Default::default()
        });
        let outcome = scheduler.schedule(rating, Some(&state), elapsed, fixed_now());
        let d = outcome.state.difficulty();
        prop_assert!(d >= min && d <= min + width, "difficulty {} outside [{}, {}]", d, min, min + width);
    }

    #[test]
    fn empty_weights_equal_default_weights(
        rating in arb_rating(),
        state in proptest::option::of(arb_memory_state()),
        elapsed in arb_elapsed(),
    ) {
        let empty = ConfigOverride { weights: Some(Vec::new()), ..Default::default() };
        let explicit = ConfigOverride { weights: Some(DEFAULT_WEIGHTS.to_vec()), ..Default::default() };
        let a = schedule(rating, state.as_ref(), elapsed, fixed_now(), Some(&empty));
        let b = schedule(rating, state.as_ref(), elapsed, fixed_now(), Some(&explicit));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn identical_inputs_identical_bytes(
        rating in arb_rating(),
        state in proptest::option::of(arb_memory_state()),
        elapsed in arb_elapsed(),
    ) {
        let a = schedule(rating, state.as_ref(), elapsed, fixed_now(), None);
        let b = schedule(rating, state.as_ref(), elapsed, fixed_now(), None);
        prop_assert_eq!(serde_json::to_vec(&a).unwrap(), serde_json::to_vec(&b).unwrap());
    }
}
