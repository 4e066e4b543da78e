//! Two-pass hybrid retriever.
//!
//! The symbolic pass unions exact-match lookups over keys derived from
//! the chart. Structural keys (planet/house, planet/sign, house-lord)
//! grant the symbolic boost; domain and scope tag keys only seed
//! candidates, so a rule the chart does not structurally match never
//! outranks one it does. The semantic pass runs when free text is
//! present or the symbolic pass came up thin, and its failure degrades
//! the result to symbolic-only instead of erroring.

use std::collections::BTreeMap;
use std::sync::Arc;

use jyotish_core::config::RetrievalConfig;
use jyotish_core::errors::{JyotishError, JyotishResult};
use jyotish_core::models::{QueryContext, RetrievalOutcome};
use jyotish_core::rule::{KeyType, Rule};
use jyotish_core::traits::IEmbeddingProvider;
use jyotish_store::engine::StoreEngine;
use jyotish_store::snapshot::IndexSnapshot;
use tracing::{debug, warn};

use crate::chart_keys;
use crate::conflict;
use crate::scoring::{self, Candidate};

pub struct RetrieverEngine {
    store: Arc<StoreEngine>,
    embedder: Option<Arc<dyn IEmbeddingProvider>>,
    config: RetrievalConfig,
}

impl RetrieverEngine {
    pub fn new(store: Arc<StoreEngine>, config: RetrievalConfig) -> Self {
        Self {
            store,
            embedder: None,
            config,
        }
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn IEmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Retrieve against the store's current snapshot.
    pub fn retrieve(&self, query: &QueryContext) -> JyotishResult<RetrievalOutcome> {
        let snapshot = self.store.snapshot();
        self.retrieve_from(&snapshot, query)
    }

    /// Retrieve against a caller-held snapshot. Callers running several
    /// retrievals for one request pin a snapshot so every domain sees
    /// the same rule set.
    pub fn retrieve_from(
        &self,
        snapshot: &IndexSnapshot,
        query: &QueryContext,
    ) -> JyotishResult<RetrievalOutcome> {
        if !query.has_signal() {
            return Err(JyotishError::InvalidQuery {
                reason: "query carries neither chart facts nor query text".to_string(),
            });
        }

        let limit = if query.limit == 0 {
            self.config.default_limit
        } else {
            query.limit
        };

        // Pass 1: symbolic.
        let keys = chart_keys::derive(query.chart.as_ref(), query.domain, query.scope);
        let mut candidates: BTreeMap<String, Candidate> = BTreeMap::new();
        let mut boosted = 0usize;
        for (key_type, key_value) in &keys {
            let structural = is_structural(*key_type);
            for rule in snapshot.lookup(*key_type, key_value) {
                if !self.passes_filters(rule, query) {
                    continue;
                }
                let entry = candidates
                    .entry(rule.id.clone())
                    .or_insert_with(|| Candidate {
                        rule: Arc::clone(rule),
                        symbolic_boost: 0.0,
                        semantic_score: 0.0,
                    });
                if structural && entry.symbolic_boost == 0.0 {
                    entry.symbolic_boost = 1.0;
                    boosted += 1;
                }
            }
        }
        debug!(
            generation = snapshot.generation,
            keys = keys.len(),
            candidates = candidates.len(),
            boosted,
            "symbolic pass complete"
        );

        // Pass 2: semantic, when warranted.
        let has_text = query
            .query_text
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        let mut degraded = false;
        if has_text || boosted < self.config.min_symbolic_candidates {
            match self.semantic_pass(snapshot, query, limit) {
                Ok(hits) => {
                    for (rule, score) in hits {
                        if !self.passes_filters(&rule, query) {
                            continue;
                        }
                        let entry = candidates
                            .entry(rule.id.clone())
                            .or_insert_with(|| Candidate {
                                rule: Arc::clone(&rule),
                                symbolic_boost: 0.0,
                                semantic_score: 0.0,
                            });
                        entry.semantic_score = entry.semantic_score.max(score);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "semantic pass unavailable, ranking symbolic-only");
                    degraded = true;
                }
            }
        }

        // Score, resolve cancellations against the full candidate set,
        // then order deterministically and truncate.
        let ranked = scoring::score(candidates.into_values().collect(), &self.config.scoring);
        let mut results = conflict::resolve(ranked);
        results.sort_by(scoring::compare);
        results.truncate(limit);

        debug!(
            results = results.len(),
            degraded, "retrieval complete"
        );
        Ok(RetrievalOutcome {
            results,
            degraded,
            generation: snapshot.generation,
        })
    }

    fn semantic_pass(
        &self,
        snapshot: &IndexSnapshot,
        query: &QueryContext,
        limit: usize,
    ) -> JyotishResult<Vec<(Arc<Rule>, f64)>> {
        let embedder = self.embedder.as_ref().ok_or(JyotishError::Embedding(
            jyotish_core::errors::EmbeddingError::ProviderUnavailable {
                provider: "none configured".to_string(),
            },
        ))?;

        let mut text = String::new();
        if let Some(chart) = &query.chart {
            text.push_str(&chart.summary());
        }
        if let Some(q) = query.query_text.as_deref() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(q);
        }

        let vector = embedder.embed(&text)?;
        Ok(snapshot.semantic_search(&vector, limit, query.domain))
    }

    fn passes_filters(&self, rule: &Rule, query: &QueryContext) -> bool {
        if rule.weight.value() < query.min_weight {
            return false;
        }
        if query.domain.is_some_and(|d| rule.domain != d) {
            return false;
        }
        if query.scope.is_some_and(|s| rule.scope != s) {
            return false;
        }
        true
    }
}

fn is_structural(key_type: KeyType) -> bool {
    matches!(
        key_type,
        KeyType::PlanetHouse | KeyType::HouseLord | KeyType::PlanetSign | KeyType::Yoga
    )
}
