//! Scheduler configuration.
//!
//! [`SchedulerConfig`] is what callers write (env, JSON, code).
//! [`Parameters`] is the resolved form the scheduler runs on: every invalid
//! field has already been replaced by its built-in default, so resolution
//! never fails.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::sanitize::is_valid_weight_vector;
use crate::types::{
    DEFAULT_DIFFICULTY_MAX, DEFAULT_DIFFICULTY_MIN, DEFAULT_GRADUATING_STABILITY_DAYS,
    DEFAULT_LEARNING_STEPS_DAYS, DEFAULT_MAXIMUM_INTERVAL_DAYS, DEFAULT_TARGET_RETENTION,
    DEFAULT_WEIGHTS, WEIGHT_COUNT,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    pub weights: Vec<f64>,
    pub target_retention: f64,
    pub maximum_interval_days: u32,
    pub difficulty_min: f64,
    pub difficulty_max: f64,
    pub learning_steps_days: Vec<u32>,
    pub graduating_stability_days: f64,
    /// UTC hour due dates are normalized to
    pub day_start_hour: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS.to_vec(),
            target_retention: DEFAULT_TARGET_RETENTION,
            maximum_interval_days: DEFAULT_MAXIMUM_INTERVAL_DAYS,
            difficulty_min: DEFAULT_DIFFICULTY_MIN,
            difficulty_max: DEFAULT_DIFFICULTY_MAX,
            learning_steps_days: DEFAULT_LEARNING_STEPS_DAYS.to_vec(),
            graduating_stability_days: DEFAULT_GRADUATING_STABILITY_DAYS,
            day_start_hour: 0,
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Reads the `SRS_*` keys through `get`; unparsable values keep their
    /// defaults.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let weights = get("SRS_WEIGHTS")
            .map(|raw| parse_list::<f64>("SRS_WEIGHTS", &raw))
            .unwrap_or(defaults.weights);

        let target_retention = get("SRS_TARGET_RETENTION")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .unwrap_or(defaults.target_retention);

        let maximum_interval_days = get("SRS_MAXIMUM_INTERVAL_DAYS")
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(defaults.maximum_interval_days);

        let learning_steps_days = get("SRS_LEARNING_STEPS")
            .map(|raw| parse_list::<u32>("SRS_LEARNING_STEPS", &raw))
            .unwrap_or(defaults.learning_steps_days);

        let graduating_stability_days = get("SRS_GRADUATING_STABILITY")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .unwrap_or(defaults.graduating_stability_days);

        let day_start_hour = get("SRS_DAY_START_HOUR")
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(defaults.day_start_hour);

        Self {
            weights,
            target_retention,
            maximum_interval_days,
            learning_steps_days,
            graduating_stability_days,
            day_start_hour,
            ..defaults
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| SchedulerError::Config(err.to_string()))
    }

    pub fn resolve(&self) -> Parameters {
        Parameters::from(self)
    }
}

/// An empty list means "use the defaults"; a list with any bad entry is
/// dropped whole.
fn parse_list<T: std::str::FromStr>(key: &str, raw: &str) -> Vec<T> {
    let parsed: std::result::Result<Vec<T>, _> = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse::<T>)
        .collect();
    match parsed {
        Ok(values) => values,
        Err(_) => {
            tracing::warn!(key, "unparsable list, using defaults");
            Vec::new()
        }
    }
}

/// Per-call override; `None` fields keep the base configuration's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOverride {
    pub weights: Option<Vec<f64>>,
    pub target_retention: Option<f64>,
    pub maximum_interval_days: Option<u32>,
}

impl ConfigOverride {
    pub fn apply_to(&self, base: &SchedulerConfig) -> SchedulerConfig {
        let mut config = base.clone();
        if let Some(weights) = &self.weights {
            config.weights = weights.clone();
        }
        if let Some(target_retention) = self.target_retention {
            config.target_retention = target_retention;
        }
        if let Some(maximum_interval_days) = self.maximum_interval_days {
            config.maximum_interval_days = maximum_interval_days;
        }
        config
    }
}

/// Validated configuration.
///
/// Only obtainable through [`SchedulerConfig::resolve`] (or `Default`), so
/// the bounds below always hold: `maximum_interval_days >= 1`,
/// `difficulty_min < difficulty_max`, `target_retention` in (0, 1).
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub(crate) weights: [f64; WEIGHT_COUNT],
    pub(crate) target_retention: f64,
    pub(crate) maximum_interval_days: u32,
    pub(crate) difficulty_min: f64,
    pub(crate) difficulty_max: f64,
    /// Ascending, deduplicated, never empty
    pub(crate) learning_steps_days: Vec<u32>,
    pub(crate) graduating_stability_days: f64,
    pub(crate) day_start_hour: u32,
}

impl Parameters {
    pub fn weights(&self) -> &[f64; WEIGHT_COUNT] {
        &self.weights
    }

    pub fn target_retention(&self) -> f64 {
        self.target_retention
    }

    pub fn maximum_interval_days(&self) -> u32 {
        self.maximum_interval_days
    }

    /// `(min, max)`, min strictly below max
    pub fn difficulty_bounds(&self) -> (f64, f64) {
        (self.difficulty_min, self.difficulty_max)
    }

    pub fn learning_steps_days(&self) -> &[u32] {
        &self.learning_steps_days
    }

    pub fn graduating_stability_days(&self) -> f64 {
        self.graduating_stability_days
    }

    pub fn day_start_hour(&self) -> u32 {
        self.day_start_hour
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters::from(&SchedulerConfig::default())
    }
}

impl From<&SchedulerConfig> for Parameters {
    fn from(config: &SchedulerConfig) -> Self {
        let weights = resolve_weights(&config.weights);

        let target_retention =
            if config.target_retention > 0.0 && config.target_retention < 1.0 {
                config.target_retention
            } else {
                tracing::warn!(
                    value = config.target_retention,
                    "target retention outside (0, 1), using default"
                );
                DEFAULT_TARGET_RETENTION
            };

        let maximum_interval_days = if config.maximum_interval_days == 0 {
            tracing::warn!("maximum interval of 0 days, using default");
            DEFAULT_MAXIMUM_INTERVAL_DAYS
        } else {
            config.maximum_interval_days
        };

        let bounds_valid = config.difficulty_min.is_finite()
            && config.difficulty_max.is_finite()
            && config.difficulty_min >= 0.0
            && config.difficulty_min < config.difficulty_max;
        let (difficulty_min, difficulty_max) = if bounds_valid {
            (config.difficulty_min, config.difficulty_max)
        } else {
            tracing::warn!(
                min = config.difficulty_min,
                max = config.difficulty_max,
                "invalid difficulty bounds, using defaults"
            );
            (DEFAULT_DIFFICULTY_MIN, DEFAULT_DIFFICULTY_MAX)
        };

        let mut learning_steps_days: Vec<u32> = config
            .learning_steps_days
            .iter()
            .copied()
            .filter(|&step| step > 0)
            .map(|step| step.min(maximum_interval_days))
            .collect();
        learning_steps_days.sort_unstable();
        learning_steps_days.dedup();
        if learning_steps_days.is_empty() {
            learning_steps_days = DEFAULT_LEARNING_STEPS_DAYS
                .iter()
                .map(|&step| step.min(maximum_interval_days))
                .collect();
            learning_steps_days.dedup();
        }

        let graduating_stability_days = if config.graduating_stability_days.is_finite()
            && config.graduating_stability_days > 0.0
        {
            config.graduating_stability_days
        } else {
            tracing::warn!(
                value = config.graduating_stability_days,
                "invalid graduating stability, using default"
            );
            DEFAULT_GRADUATING_STABILITY_DAYS
        };

        let day_start_hour = if config.day_start_hour < 24 {
            config.day_start_hour
        } else {
            tracing::warn!(value = config.day_start_hour, "day start hour >= 24, using 0");
            0
        };

        Self {
            weights,
            target_retention,
            maximum_interval_days,
            difficulty_min,
            difficulty_max,
            learning_steps_days,
            graduating_stability_days,
            day_start_hour,
        }
    }
}

fn resolve_weights(weights: &[f64]) -> [f64; WEIGHT_COUNT] {
    if !is_valid_weight_vector(weights) {
        if !weights.is_empty() {
            tracing::warn!(len = weights.len(), "malformed weight vector, using defaults");
        }
        return DEFAULT_WEIGHTS;
    }
    let mut resolved = [0.0; WEIGHT_COUNT];
    resolved.copy_from_slice(weights);
    resolved
}
