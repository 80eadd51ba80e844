//! Scheduler Core
//!
//! Maps (memory state, rating, elapsed days, now, configuration) to a new
//! memory state and a due date. Pure and deterministic: inputs are never
//! mutated and nothing outside the arguments is read.
//!
//! Phase transitions:
//! - `New`: Fail/Hard/Good → `Learning`, Easy → `Review`
//! - `Learning`: Fail stays (no lapse); a pass graduates to `Review` once
//!   stability reaches the graduating threshold, otherwise it moves to the
//!   next fixed learning step
//! - `Review`: Fail → `Relearning` with a lapse; a pass stays and the
//!   interval grows
//! - `Relearning`: Fail stays; a pass returns to `Review`

pub mod curve;
pub mod model;

use std::sync::OnceLock;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use rayon::prelude::*;

use crate::config::{ConfigOverride, Parameters, SchedulerConfig};
use crate::migration::{migrate_legacy, LegacyItem};
use crate::sanitize::{round_interval, sanitize_elapsed_days, sanitize_stability};
use crate::types::{
    MemoryState, Phase, Rating, RatingPreview, ReviewRequest, ScheduleOutcome, MIN_STABILITY,
};

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    params: Parameters,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_parameters(config.resolve())
    }

    /// `params` can only come from [`SchedulerConfig::resolve`], so they are
    /// already validated.
    pub fn with_parameters(params: Parameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Applies one review.
    ///
    /// `previous = None` is a brand-new card. `elapsed_days` that is missing,
    /// negative or non-finite counts as 0.
    pub fn schedule(
        &self,
        rating: Rating,
        previous: Option<&MemoryState>,
        elapsed_days: Option<f64>,
        now: DateTime<Utc>,
    ) -> ScheduleOutcome {
        let fresh = MemoryState::new();
        let prev = previous.unwrap_or(&fresh);
        let p = &self.params;
        let w = &p.weights;
        let max_days = f64::from(p.maximum_interval_days);

        let elapsed = sanitize_elapsed_days(elapsed_days);
        let prev_stability = sanitize_stability(prev.stability(), max_days);
        // A non-New state without stability is re-seeded like a first exposure.
        let first_exposure = prev.is_new() || prev_stability <= 0.0;

        let retrievability = if first_exposure {
            1.0
        } else {
            curve::retrievability(prev_stability, elapsed)
        };

        let (model_difficulty, raw_stability) = if first_exposure {
            (
                model::initial_difficulty(w, rating),
                model::initial_stability(w, rating),
            )
        } else {
            let d = model::next_difficulty(w, model::to_model_scale(prev.difficulty(), p), rating);
            let s = if rating.is_pass() {
                model::recall_stability(w, d, prev_stability, retrievability, rating)
            } else {
                model::forget_stability(w, d, prev_stability, retrievability)
            };
            (d, s)
        };

        let difficulty = model::from_model_scale(model_difficulty, p);
        let stability = sanitize_stability(raw_stability, max_days).max(MIN_STABILITY);

        let (phase, lapse_count) = next_phase(prev, rating, stability, p);

        let interval_days = match phase {
            Phase::Learning => learning_step(prev, rating, p),
            _ => {
                let days = round_interval(
                    curve::days_until(stability, p.target_retention),
                    p.maximum_interval_days,
                );
                if prev.phase() == Phase::Review && rating.is_pass() {
                    days.max(prev.interval_days().saturating_add(1))
                        .min(p.maximum_interval_days)
                } else {
                    days
                }
            }
        };

        tracing::debug!(
            %rating,
            from = %prev.phase(),
            to = %phase,
            elapsed,
            retrievability,
            stability,
            difficulty,
            interval_days,
            "review scheduled"
        );

        let (due_date, due_at) = self.due(now, interval_days);

        ScheduleOutcome {
            state: MemoryState::from_parts(
                stability,
                difficulty,
                phase,
                interval_days,
                lapse_count,
                Some(now),
            ),
            due_date,
            due_at,
            retrievability,
        }
    }

    /// The outcome of each rating, for labelling rating buttons.
    pub fn preview(
        &self,
        previous: Option<&MemoryState>,
        elapsed_days: Option<f64>,
        now: DateTime<Utc>,
    ) -> RatingPreview {
        let outcome = |rating| self.schedule(rating, previous, elapsed_days, now);
        RatingPreview {
            fail: outcome(Rating::Fail),
            hard: outcome(Rating::Hard),
            good: outcome(Rating::Good),
            easy: outcome(Rating::Easy),
        }
    }

    /// Schedules independent reviews in parallel (Rayon). Output order
    /// matches input order.
    pub fn schedule_batch(&self, requests: &[ReviewRequest]) -> Vec<ScheduleOutcome> {
        requests
            .par_iter()
            .map(|request| {
                self.schedule(
                    request.rating,
                    request.previous.as_ref(),
                    request.elapsed_days,
                    request.now,
                )
            })
            .collect()
    }

    /// Import-time state for a card that only carries a prior interval.
    pub fn migrate(&self, item: &LegacyItem) -> MemoryState {
        migrate_legacy(item, &self.params)
    }

    /// Predicted recall probability of `state` after `elapsed_days`.
    pub fn retrievability(&self, state: &MemoryState, elapsed_days: Option<f64>) -> f64 {
        if state.is_new() {
            return 1.0;
        }
        let stability =
            sanitize_stability(state.stability(), f64::from(self.params.maximum_interval_days));
        curve::retrievability(stability, sanitize_elapsed_days(elapsed_days))
    }

    fn due(&self, now: DateTime<Utc>, interval_days: u32) -> (NaiveDate, DateTime<Utc>) {
        let due_date = now
            .date_naive()
            .checked_add_days(Days::new(u64::from(interval_days)))
            .unwrap_or(NaiveDate::MAX);
        let start_of_day =
            NaiveTime::from_hms_opt(self.params.day_start_hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let due_at = Utc.from_utc_datetime(&due_date.and_time(start_of_day));
        (due_date, due_at)
    }
}

fn next_phase(prev: &MemoryState, rating: Rating, stability: f64, p: &Parameters) -> (Phase, u32) {
    let lapses = prev.lapse_count();
    match (prev.phase(), rating) {
        (Phase::New, Rating::Easy) => (Phase::Review, lapses),
        (Phase::New, _) => (Phase::Learning, lapses),
        (Phase::Learning, Rating::Fail) => (Phase::Learning, lapses),
        (Phase::Learning, _) if stability >= p.graduating_stability_days => (Phase::Review, lapses),
        (Phase::Learning, _) => (Phase::Learning, lapses),
        (Phase::Review, Rating::Fail) => (Phase::Relearning, lapses.saturating_add(1)),
        (Phase::Review, _) => (Phase::Review, lapses),
        (Phase::Relearning, Rating::Fail) => (Phase::Relearning, lapses),
        (Phase::Relearning, _) => (Phase::Review, lapses),
    }
}

/// First step on entry or after a Fail, otherwise the first step longer than
/// the previous interval (the last step once the ladder is exhausted).
fn learning_step(prev: &MemoryState, rating: Rating, p: &Parameters) -> u32 {
    let steps = &p.learning_steps_days;
    let first = steps.first().copied().unwrap_or(1);
    if prev.phase() != Phase::Learning || rating == Rating::Fail {
        return first.max(1);
    }
    steps
        .iter()
        .copied()
        .find(|&step| step > prev.interval_days())
        .or_else(|| steps.last().copied())
        .unwrap_or(first)
        .max(1)
}

fn default_scheduler() -> &'static Scheduler {
    static DEFAULT: OnceLock<Scheduler> = OnceLock::new();
    DEFAULT.get_or_init(Scheduler::default)
}

/// Single entry point: `schedule(rating, previousState, elapsedDays, now, config?)`.
///
/// Without an override the process-wide default configuration is used;
/// override fields replace the corresponding defaults.
pub fn schedule(
    rating: Rating,
    previous: Option<&MemoryState>,
    elapsed_days: Option<f64>,
    now: DateTime<Utc>,
    config: Option<&ConfigOverride>,
) -> ScheduleOutcome {
    match config {
        Some(overrides) => Scheduler::new(overrides.apply_to(&SchedulerConfig::default()))
            .schedule(rating, previous, elapsed_days, now),
        None => default_scheduler().schedule(rating, previous, elapsed_days, now),
    }
}
