use serde::{Deserialize, Serialize};

use crate::config::ConfidenceThresholds;
use crate::rule::Domain;

/// Felt strength of a forecast period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

/// Discretized confidence band derived from a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    /// Map a numeric score to a band using the configured thresholds.
    pub fn from_score(score: u8, thresholds: &ConfidenceThresholds) -> Self {
        if score >= thresholds.very_high {
            ConfidenceLevel::VeryHigh
        } else if score >= thresholds.high {
            ConfidenceLevel::High
        } else if score >= thresholds.medium {
            ConfidenceLevel::Medium
        } else if score >= thresholds.low {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }
}

/// One labeled stretch inside the forecast window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPeriod {
    /// Human label, e.g. "months 3–5".
    pub label: String,
    /// What the period brings.
    pub event: String,
    pub intensity: Intensity,
}

/// A time-windowed forecast for one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub domain: Domain,
    pub summary: String,
    /// Ordered as the reasoner listed them.
    pub key_periods: Vec<KeyPeriod>,
    /// 0–100.
    pub confidence_score: u8,
    pub confidence_level: ConfidenceLevel,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_bands_at_default_thresholds() {
        let t = ConfidenceThresholds::default();
        assert_eq!(ConfidenceLevel::from_score(95, &t), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_score(90, &t), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_score(75, &t), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(50, &t), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(25, &t), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(24, &t), ConfidenceLevel::VeryLow);
    }
}
