//! Difficulty and stability updates.
//!
//! The weight formulas are written against a 1–10 difficulty scale and the
//! 1..=4 grade scale. Configured difficulty bounds are mapped linearly onto
//! that model scale and back, so the default bounds are the identity.

use crate::config::Parameters;
use crate::sanitize::clamp_difficulty;
use crate::types::{Rating, MIN_STABILITY, WEIGHT_COUNT};

const MODEL_D_MIN: f64 = 1.0;
const MODEL_D_MAX: f64 = 10.0;

type Weights = [f64; WEIGHT_COUNT];

/// Configured difficulty → model scale.
pub fn to_model_scale(difficulty: f64, params: &Parameters) -> f64 {
    let d = clamp_difficulty(difficulty, params.difficulty_min, params.difficulty_max);
    let span = params.difficulty_max - params.difficulty_min;
    MODEL_D_MIN + (d - params.difficulty_min) / span * (MODEL_D_MAX - MODEL_D_MIN)
}

/// Model scale → configured difficulty, clamped to the configured bounds.
pub fn from_model_scale(model_difficulty: f64, params: &Parameters) -> f64 {
    let span = params.difficulty_max - params.difficulty_min;
    let d = params.difficulty_min
        + (model_difficulty - MODEL_D_MIN) / (MODEL_D_MAX - MODEL_D_MIN) * span;
    clamp_difficulty(d, params.difficulty_min, params.difficulty_max)
}

fn clamp_model(d: f64) -> f64 {
    clamp_difficulty(d, MODEL_D_MIN, MODEL_D_MAX)
}

/// S0(G) = w[G-1]
pub fn initial_stability(w: &Weights, rating: Rating) -> f64 {
    w[usize::from(rating.ordinal())].max(MIN_STABILITY)
}

/// D0(G) = w4 - (G-3)·w5
pub fn initial_difficulty(w: &Weights, rating: Rating) -> f64 {
    clamp_model(w[4] - (rating.grade() - 3.0) * w[5])
}

/// D' = w7·D0(Good) + (1-w7)·(D - w6·(G-3))
///
/// Fail and Hard push difficulty up, Easy pulls it down, and every review
/// reverts it slightly toward the Good seed.
pub fn next_difficulty(w: &Weights, d: f64, rating: Rating) -> f64 {
    let shifted = d - w[6] * (rating.grade() - 3.0);
    clamp_model(w[7] * w[4] + (1.0 - w[7]) * shifted)
}

/// Stability after a successful recall. Never below `s`; grows more for
/// Easy, less for Hard, and more the lower retrievability was at review.
pub fn recall_stability(w: &Weights, d: f64, s: f64, r: f64, rating: Rating) -> f64 {
    let hard_penalty = if rating == Rating::Hard { w[15] } else { 1.0 };
    let easy_bonus = if rating == Rating::Easy { w[16] } else { 1.0 };

    let growth = w[8].exp()
        * (11.0 - clamp_model(d))
        * s.powf(-w[9])
        * ((1.0 - r) * w[10]).exp_m1()
        * hard_penalty
        * easy_bonus;
    s * (1.0 + growth.max(0.0))
}

/// Stability after a failed recall, kept within `[MIN_STABILITY, s]`.
pub fn forget_stability(w: &Weights, d: f64, s: f64, r: f64) -> f64 {
    let new_s = w[11]
        * clamp_model(d).powf(-w[12])
        * ((s + 1.0).powf(w[13]) - 1.0)
        * ((1.0 - r) * w[14]).exp();
    if !new_s.is_finite() {
        return s.max(MIN_STABILITY);
    }
    new_s.clamp(MIN_STABILITY, s.max(MIN_STABILITY))
}
