//! Legacy item migration.
//!
//! Imported cards arrive with only a prior interval. Treating them as new
//! would collapse a well-known card back to a one-day interval, so the prior
//! interval is taken as the last known stability and the card starts in
//! `Review`. Applied once, at import time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Parameters;
use crate::sanitize::{round_interval, sanitize_stability};
use crate::types::{MemoryState, Phase};

/// A card as exported by an external system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyItem {
    pub prior_interval_days: Option<f64>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub lapse_count: Option<u32>,
}

impl LegacyItem {
    pub fn with_interval(prior_interval_days: f64) -> Self {
        Self {
            prior_interval_days: Some(prior_interval_days),
            ..Default::default()
        }
    }
}

/// Builds the initial [`MemoryState`] for an imported card.
///
/// With a usable prior interval: stability = interval, difficulty = midpoint
/// of the configured bounds, phase = `Review`. Without one: a `New` card.
pub fn migrate_legacy(item: &LegacyItem, params: &Parameters) -> MemoryState {
    let prior = item
        .prior_interval_days
        .filter(|days| days.is_finite() && *days > 0.0);

    let Some(prior) = prior else {
        tracing::debug!("legacy item without history, importing as new");
        return MemoryState::new();
    };

    let stability = sanitize_stability(prior, f64::from(params.maximum_interval_days));
    let difficulty = (params.difficulty_min + params.difficulty_max) / 2.0;
    let interval_days = round_interval(prior, params.maximum_interval_days);

    MemoryState::from_parts(
        stability,
        difficulty,
        Phase::Review,
        interval_days,
        item.lapse_count.unwrap_or(0),
        item.last_reviewed_at,
    )
}

/// Shorthand for an item that carries only its prior interval.
pub fn migrate_interval(prior_interval_days: Option<f64>, params: &Parameters) -> MemoryState {
    let item = LegacyItem {
        prior_interval_days,
        ..Default::default()
    };
    migrate_legacy(&item, params)
}
