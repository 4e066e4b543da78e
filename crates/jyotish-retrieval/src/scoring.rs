//! Combined relevance scoring.
//!
//! `relevance = w_sym·boost + w_sem·similarity + w_wt·rule_weight`,
//! weights from `RetrievalConfig`. Final order is fully deterministic:
//! relevance desc, then rule weight desc, then rule id asc.

use std::cmp::Ordering;
use std::sync::Arc;

use jyotish_core::config::ScoringWeights;
use jyotish_core::models::RankedRule;
use jyotish_core::rule::Rule;

/// A candidate before scoring: which passes matched it and how well.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub rule: Arc<Rule>,
    pub symbolic_boost: f64,
    pub semantic_score: f64,
}

/// Score candidates into ranked rules (unsorted; the engine orders
/// after conflict resolution).
pub fn score(candidates: Vec<Candidate>, weights: &ScoringWeights) -> Vec<RankedRule> {
    candidates
        .into_iter()
        .map(|c| {
            let relevance = weights.symbolic * c.symbolic_boost
                + weights.semantic * c.semantic_score
                + weights.weight * c.rule.weight.value();
            RankedRule {
                symbolic_boost: c.symbolic_boost,
                semantic_score: c.semantic_score,
                relevance,
                rule: c.rule,
            }
        })
        .collect()
}

/// Total order for ranked rules: relevance desc, weight desc, id asc.
pub fn compare(a: &RankedRule, b: &RankedRule) -> Ordering {
    b.relevance
        .partial_cmp(&a.relevance)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.rule
                .weight
                .value()
                .partial_cmp(&a.rule.weight.value())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.rule.id.cmp(&b.rule.id))
}
