//! Common Types and Constants
//!
//! Ratings, lifecycle phases and the persisted per-card memory state shared
//! by the scheduler, the migration helper and callers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

// ==================== Constants ====================

/// Forgetting-curve exponent
pub const DECAY: f64 = -0.5;

/// Forgetting-curve scale, chosen so that R(S) = 0.9
pub const FACTOR: f64 = 19.0 / 81.0;

/// Number of entries in a weight vector
pub const WEIGHT_COUNT: usize = 17;

/// Built-in weight vector (FSRS-4.5 layout)
pub const DEFAULT_WEIGHTS: [f64; WEIGHT_COUNT] = [
    0.4, 0.6, 2.4, 5.8, // w0-w3: initial stability per grade
    4.93, 0.94, 0.86, 0.01, // w4-w7: difficulty
    1.49, 0.14, 0.94, // w8-w10: recall stability
    2.18, 0.05, 0.34, 1.26, // w11-w14: forget stability
    0.29, 2.61, // w15-w16: hard penalty, easy bonus
];

/// Default target retention
pub const DEFAULT_TARGET_RETENTION: f64 = 0.9;

/// Default interval cap (100 years)
pub const DEFAULT_MAXIMUM_INTERVAL_DAYS: u32 = 36500;

/// Default difficulty bounds
pub const DEFAULT_DIFFICULTY_MIN: f64 = 1.0;
pub const DEFAULT_DIFFICULTY_MAX: f64 = 10.0;

/// Classic graduated steps used while a card is in `Learning`
pub const DEFAULT_LEARNING_STEPS_DAYS: [u32; 2] = [1, 6];

/// Stability a `Learning` card needs before it graduates to `Review`
pub const DEFAULT_GRADUATING_STABILITY_DAYS: f64 = 6.0;

/// Floor for any stability produced by a review
pub const MIN_STABILITY: f64 = 0.1;

/// Numerical stability epsilon
pub const EPSILON: f64 = 1e-10;

// ==================== Rating ====================

/// Recall quality reported by the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Rating {
    Fail = 0,
    /// "difícil"
    Hard = 1,
    Good = 2,
    /// "fácil"
    Easy = 3,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Fail, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Grade on the 1..=4 scale the weight formulas are written against.
    pub fn grade(self) -> f64 {
        f64::from(self.ordinal() + 1)
    }

    pub fn is_pass(self) -> bool {
        self != Rating::Fail
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Fail => "fail",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = SchedulerError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Rating::Fail),
            1 => Ok(Rating::Hard),
            2 => Ok(Rating::Good),
            3 => Ok(Rating::Easy),
            other => Err(SchedulerError::invalid_rating(other)),
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = SchedulerError;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .map_err(|_| SchedulerError::invalid_rating(value))
            .and_then(Rating::try_from)
    }
}

impl FromStr for Rating {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "0" | "fail" | "again" => Ok(Rating::Fail),
            "1" | "hard" | "difícil" | "dificil" => Ok(Rating::Hard),
            "2" | "good" => Ok(Rating::Good),
            "3" | "easy" | "fácil" | "facil" => Ok(Rating::Easy),
            _ => Err(SchedulerError::invalid_rating(format!("{s:?}"))),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which grades a rating UI surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSet {
    /// Fail / Hard / Easy
    ThreeButton,
    /// Fail / Hard / Good / Easy
    FourButton,
}

impl ButtonSet {
    pub fn ratings(self) -> &'static [Rating] {
        match self {
            ButtonSet::ThreeButton => &[Rating::Fail, Rating::Hard, Rating::Easy],
            ButtonSet::FourButton => &Rating::ALL,
        }
    }

    /// Maps a 0-based button index to its grade.
    pub fn rating_for_button(self, index: usize) -> Result<Rating> {
        self.ratings().get(index).copied().ok_or_else(|| {
            SchedulerError::invalid_rating(format!("button {index} of {self:?}"))
        })
    }
}

// ==================== Phase ====================

/// Lifecycle stage of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::New => "new",
            Phase::Learning => "learning",
            Phase::Review => "review",
            Phase::Relearning => "relearning",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Memory State ====================

/// Per-card, per-user memory state.
///
/// Fields are private: a state only changes through the scheduler, the
/// legacy migration helper or [`MemoryState::reset`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryState {
    stability: f64,
    difficulty: f64,
    phase: Phase,
    interval_days: u32,
    lapse_count: u32,
    last_reviewed_at: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// A card that has never been reviewed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates a state from persisted columns.
    ///
    /// Non-finite or negative numbers are zeroed; they are clamped to the
    /// configured bounds on the next review.
    pub fn restore(
        stability: f64,
        difficulty: f64,
        phase: Phase,
        interval_days: u32,
        lapse_count: u32,
        last_reviewed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            stability: non_negative(stability),
            difficulty: non_negative(difficulty),
            phase,
            interval_days,
            lapse_count,
            last_reviewed_at,
        }
    }

    pub(crate) fn from_parts(
        stability: f64,
        difficulty: f64,
        phase: Phase,
        interval_days: u32,
        lapse_count: u32,
        last_reviewed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            stability,
            difficulty,
            phase,
            interval_days,
            lapse_count,
            last_reviewed_at,
        }
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn interval_days(&self) -> u32 {
        self.interval_days
    }

    pub fn lapse_count(&self) -> u32 {
        self.lapse_count
    }

    pub fn last_reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed_at
    }

    pub fn is_new(&self) -> bool {
        self.phase == Phase::New
    }

    /// Explicit "reset progress": back to `New`, all memory discarded.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Fractional days since the last review, 0 if never reviewed or if
    /// `now` precedes the last review.
    pub fn elapsed_days_since(&self, now: DateTime<Utc>) -> f64 {
        match self.last_reviewed_at {
            Some(last) => {
                let secs = now.signed_duration_since(last).num_seconds();
                (secs as f64 / 86_400.0).max(0.0)
            }
            None => 0.0,
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

// ==================== Scheduling Results ====================

/// Result of one review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    pub state: MemoryState,
    /// Calendar day the card is next due
    pub due_date: NaiveDate,
    /// `due_date` at the configured start-of-day hour
    pub due_at: DateTime<Utc>,
    /// Predicted recall probability at the moment of this review
    pub retrievability: f64,
}

impl ScheduleOutcome {
    pub fn interval_days(&self) -> u32 {
        self.state.interval_days()
    }
}

/// Outcomes for every rating from the same starting point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingPreview {
    pub fail: ScheduleOutcome,
    pub hard: ScheduleOutcome,
    pub good: ScheduleOutcome,
    pub easy: ScheduleOutcome,
}

impl RatingPreview {
    pub fn get(&self, rating: Rating) -> &ScheduleOutcome {
        match rating {
            Rating::Fail => &self.fail,
            Rating::Hard => &self.hard,
            Rating::Good => &self.good,
            Rating::Easy => &self.easy,
        }
    }
}

/// Batch scheduling input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub rating: Rating,
    pub previous: Option<MemoryState>,
    pub elapsed_days: Option<f64>,
    pub now: DateTime<Utc>,
}
