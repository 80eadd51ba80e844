//! Input Sanitization
//!
//! Keeps every review producing a valid result: bad numbers are replaced or
//! clamped here instead of being rejected.

use crate::types::{MIN_STABILITY, WEIGHT_COUNT};

/// 检查数组是否包含无效值 (NaN 或 Inf)
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// A weight vector is usable when it has the expected length, every entry is
/// finite and non-negative, and the initial stabilities are positive.
pub fn is_valid_weight_vector(weights: &[f64]) -> bool {
    if weights.len() != WEIGHT_COUNT || has_invalid_values(weights) {
        return false;
    }
    if weights.iter().any(|&w| w < 0.0) {
        return false;
    }
    weights[..4].iter().all(|&w| w > 0.0)
}

/// Negative, NaN or infinite elapsed time counts as a same-day review.
pub fn sanitize_elapsed_days(elapsed_days: Option<f64>) -> f64 {
    match elapsed_days {
        Some(days) if days.is_finite() && days > 0.0 => days,
        _ => 0.0,
    }
}

/// Stability is never negative and never above the interval cap.
/// `+inf` (an overflowing update) saturates at the cap; NaN counts as none.
pub fn sanitize_stability(stability: f64, max: f64) -> f64 {
    if stability.is_nan() || stability <= 0.0 {
        return 0.0;
    }
    stability.min(max.max(MIN_STABILITY))
}

/// 限制难度在配置范围内; NaN 取中点
///
/// Never panics, unlike `f64::clamp`: reversed bounds are swapped.
pub fn clamp_difficulty(difficulty: f64, min: f64, max: f64) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if difficulty.is_nan() {
        return (lo + hi) / 2.0;
    }
    difficulty.max(lo).min(hi)
}

/// Rounds a day count to the nearest whole day within `[1, max]`.
pub fn round_interval(days: f64, max: u32) -> u32 {
    let max = max.max(1);
    if days.is_nan() {
        return 1;
    }
    if days.is_infinite() {
        return if days.is_sign_negative() { 1 } else { max };
    }
    let rounded = days.round();
    if rounded <= 1.0 {
        1
    } else if rounded >= f64::from(max) {
        max
    } else {
        rounded as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_WEIGHTS;

    // ==================== has_invalid_values 测试 ====================

    #[test]
    fn test_has_invalid_values() {
        assert!(!has_invalid_values(&[1.0, 2.0, 3.0]));
        assert!(!has_invalid_values(&[]));
        assert!(has_invalid_values(&[1.0, f64::NAN]));
        assert!(has_invalid_values(&[f64::NEG_INFINITY, 2.0]));
    }

    // ==================== weight vector 测试 ====================

    #[test]
    fn test_default_weights_are_valid() {
        assert!(is_valid_weight_vector(&DEFAULT_WEIGHTS));
    }

    #[test]
    fn test_malformed_weight_vectors() {
        assert!(!is_valid_weight_vector(&[]));
        assert!(!is_valid_weight_vector(&DEFAULT_WEIGHTS[..16]));

        let mut with_nan = DEFAULT_WEIGHTS;
        with_nan[8] = f64::NAN;
        assert!(!is_valid_weight_vector(&with_nan));

        let mut negative = DEFAULT_WEIGHTS;
        negative[11] = -1.0;
        assert!(!is_valid_weight_vector(&negative));

        let mut zero_initial = DEFAULT_WEIGHTS;
        zero_initial[2] = 0.0;
        assert!(!is_valid_weight_vector(&zero_initial));
    }

    // ==================== scalar 测试 ====================

    #[test]
    fn test_sanitize_elapsed_days() {
        assert_eq!(sanitize_elapsed_days(None), 0.0);
        assert_eq!(sanitize_elapsed_days(Some(-4.0)), 0.0);
        assert_eq!(sanitize_elapsed_days(Some(f64::NAN)), 0.0);
        assert_eq!(sanitize_elapsed_days(Some(f64::INFINITY)), 0.0);
        assert_eq!(sanitize_elapsed_days(Some(2.5)), 2.5);
    }

    #[test]
    fn test_sanitize_stability() {
        assert_eq!(sanitize_stability(-1.0, 100.0), 0.0);
        assert_eq!(sanitize_stability(f64::NAN, 100.0), 0.0);
        assert_eq!(sanitize_stability(500.0, 100.0), 100.0);
        assert_eq!(sanitize_stability(12.0, 100.0), 12.0);
        assert_eq!(sanitize_stability(f64::INFINITY, 100.0), 100.0);
        assert_eq!(sanitize_stability(f64::NEG_INFINITY, 100.0), 0.0);
    }

    #[test]
    fn test_clamp_difficulty() {
        assert_eq!(clamp_difficulty(-50.0, 1.0, 10.0), 1.0);
        assert_eq!(clamp_difficulty(1e9, 1.0, 10.0), 10.0);
        assert_eq!(clamp_difficulty(f64::NAN, 1.0, 10.0), 5.5);
        assert_eq!(clamp_difficulty(f64::INFINITY, 1.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_difficulty_reversed_bounds() {
        assert_eq!(clamp_difficulty(5.0, 8.0, 2.0), 5.0);
        assert_eq!(clamp_difficulty(9.0, 8.0, 2.0), 8.0);
        assert_eq!(clamp_difficulty(f64::NAN, 8.0, 2.0), 5.0);
        assert!(clamp_difficulty(4.0, f64::NAN, 3.0).is_finite());
    }

    #[test]
    fn test_round_interval() {
        assert_eq!(round_interval(0.2, 36500), 1);
        assert_eq!(round_interval(2.5, 36500), 3);
        assert_eq!(round_interval(2.4, 36500), 2);
        assert_eq!(round_interval(1e12, 36500), 36500);
        assert_eq!(round_interval(f64::INFINITY, 100), 100);
        assert_eq!(round_interval(f64::NAN, 100), 1);
        assert_eq!(round_interval(50.0, 0), 1);
    }
}
