use serde::{Deserialize, Serialize};

use super::defaults;

/// Linear combination weights for hybrid relevance scoring.
///
/// `relevance = symbolic·boost + semantic·score + weight·rule_weight`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub symbolic: f64,
    pub semantic: f64,
    pub weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            symbolic: defaults::DEFAULT_SCORE_SYMBOLIC,
            semantic: defaults::DEFAULT_SCORE_SEMANTIC,
            weight: defaults::DEFAULT_SCORE_WEIGHT,
        }
    }
}

/// Hybrid retriever configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub scoring: ScoringWeights,
    /// Default result limit when the query does not set one.
    pub default_limit: usize,
    /// Default minimum rule weight.
    pub default_min_weight: f64,
    /// The semantic pass runs when the symbolic pass yields fewer
    /// candidates than this.
    pub min_symbolic_candidates: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringWeights::default(),
            default_limit: defaults::DEFAULT_RESULT_LIMIT,
            default_min_weight: defaults::DEFAULT_MIN_WEIGHT,
            min_symbolic_candidates: defaults::DEFAULT_MIN_SYMBOLIC_CANDIDATES,
        }
    }
}
