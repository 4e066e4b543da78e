use serde::{Deserialize, Serialize};

use super::defaults;

/// Verifier decision thresholds. Quality score and citation accuracy
/// jointly determine the overall confidence band: `high` requires both
/// high thresholds to hold, `medium` both medium thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    pub quality_high: f64,
    pub accuracy_high: f64,
    pub quality_medium: f64,
    pub accuracy_medium: f64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            quality_high: defaults::DEFAULT_QUALITY_HIGH,
            accuracy_high: defaults::DEFAULT_ACCURACY_HIGH,
            quality_medium: defaults::DEFAULT_QUALITY_MEDIUM,
            accuracy_medium: defaults::DEFAULT_ACCURACY_MEDIUM,
        }
    }
}
