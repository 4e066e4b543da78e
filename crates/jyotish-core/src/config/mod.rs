//! Configuration for every subsystem.
//!
//! All scoring weights, thresholds, budgets, and TTLs are policy knobs
//! that live here. No call site hardcodes them.

mod budget_config;
mod cache_config;
mod defaults;
mod embedding_config;
mod prediction_config;
mod reasoner_config;
mod retrieval_config;
mod verifier_config;

pub use budget_config::BudgetConfig;
pub use cache_config::CacheConfig;
pub use embedding_config::EmbeddingConfig;
pub use prediction_config::{ConfidenceThresholds, PredictionConfig};
pub use reasoner_config::ReasonerConfig;
pub use retrieval_config::{RetrievalConfig, ScoringWeights};
pub use verifier_config::VerifierConfig;

use serde::{Deserialize, Serialize};

/// Aggregate configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JyotishConfig {
    pub retrieval: RetrievalConfig,
    pub prediction: PredictionConfig,
    pub budget: BudgetConfig,
    pub cache: CacheConfig,
    pub reasoner: ReasonerConfig,
    pub embedding: EmbeddingConfig,
    pub verifier: VerifierConfig,
}

impl JyotishConfig {
    /// Parse from a TOML string. Missing sections and fields fall back
    /// to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = JyotishConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.budget.ceiling, defaults::DEFAULT_BUDGET_CEILING);
        assert_eq!(cfg.retrieval.scoring.symbolic, 0.4);
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg = JyotishConfig::from_toml_str(
            "[budget]\nceiling = 4000\n\n[retrieval.scoring]\nsymbolic = 0.5\n",
        )
        .unwrap();
        assert_eq!(cfg.budget.ceiling, 4000);
        assert_eq!(cfg.retrieval.scoring.symbolic, 0.5);
        // Untouched fields keep defaults.
        assert_eq!(cfg.retrieval.scoring.weight, 0.2);
    }
}
