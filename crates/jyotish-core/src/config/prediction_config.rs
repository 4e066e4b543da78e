use serde::{Deserialize, Serialize};

use super::defaults;

/// Bands mapping a 0–100 confidence score to a discrete level.
/// Anything below `low` is very_low.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    pub very_high: u8,
    pub high: u8,
    pub medium: u8,
    pub low: u8,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            very_high: defaults::DEFAULT_VERY_HIGH_THRESHOLD,
            high: defaults::DEFAULT_HIGH_THRESHOLD,
            medium: defaults::DEFAULT_MEDIUM_THRESHOLD,
            low: defaults::DEFAULT_LOW_THRESHOLD,
        }
    }
}

/// Prediction engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub thresholds: ConfidenceThresholds,
    /// Default forecast window when the request does not set one.
    pub default_window_months: u32,
    /// Corrective re-prompts after the first parse failure.
    pub parse_retries: u8,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            thresholds: ConfidenceThresholds::default(),
            default_window_months: defaults::DEFAULT_WINDOW_MONTHS,
            parse_retries: defaults::DEFAULT_PARSE_RETRIES,
        }
    }
}
