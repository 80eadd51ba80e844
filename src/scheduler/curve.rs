//! Power forgetting curve.
//!
//! R(t, S) = (1 + F·t/S)^D with D = -0.5 and F = 19/81, so R(S, S) = 0.9.
//! The interval for a target retention r is the inverse:
//! t = S/F · (r^(1/D) - 1).

use crate::types::{DECAY, FACTOR};

/// Recall probability after `elapsed_days` for a memory of `stability`.
///
/// A memory with no stability yet (first exposure) has R = 1.
pub fn retrievability(stability: f64, elapsed_days: f64) -> f64 {
    if stability <= 0.0 || !stability.is_finite() {
        return 1.0;
    }
    let elapsed = elapsed_days.max(0.0);
    (1.0 + FACTOR * elapsed / stability).powf(DECAY).clamp(0.0, 1.0)
}

/// Elapsed days at which retrievability falls to `target_retention`, unrounded.
pub fn days_until(stability: f64, target_retention: f64) -> f64 {
    let r = target_retention.clamp(0.0001, 0.9999);
    stability.max(0.0) / FACTOR * (r.powf(1.0 / DECAY) - 1.0)
}
