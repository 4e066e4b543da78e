use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::rule::Rule;

/// One ranked rule with its score breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRule {
    pub rule: Arc<Rule>,
    /// 1.0 when a derived symbolic key matched, else 0.0.
    pub symbolic_boost: f64,
    /// Cosine similarity clipped to [0, 1]; 0.0 when the semantic pass
    /// did not run or did not score this rule.
    pub semantic_score: f64,
    /// Combined relevance from the configured linear weights.
    pub relevance: f64,
}

/// Ordered retrieval output plus degradation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalOutcome {
    pub results: Vec<RankedRule>,
    /// True when the semantic pass failed or timed out and ranking fell
    /// back to symbolic-only.
    pub degraded: bool,
    /// Store snapshot generation this result was computed against.
    pub generation: u64,
}

impl RetrievalOutcome {
    pub fn rule_ids(&self) -> Vec<String> {
        self.results.iter().map(|r| r.rule.id.clone()).collect()
    }
}
