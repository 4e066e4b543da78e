//! Pipeline orchestration.
//!
//! Router → {per-domain retrieve → predict} → synthesizer → verifier.
//! Domain sub-pipelines run on scoped threads against one pinned store
//! snapshot; each generation stage is admitted against the token
//! budget before it runs and skipped whole when it no longer fits.
//! Results are served through the session cache keyed by the canonical
//! request hash.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use chrono::Utc;
use tracing::{info, warn};

use jyotish_core::chart::ChartFacts;
use jyotish_core::config::JyotishConfig;
use jyotish_core::errors::{JyotishError, JyotishResult};
use jyotish_core::models::{
    CacheMeta, DomainAnalysis, InterpretRequest, PipelineResult, Prediction, QueryContext,
    RankedRule, RuleCitation, Stage,
};
use jyotish_core::rule::Domain;
use jyotish_core::traits::IReasoner;
use jyotish_retrieval::RetrieverEngine;
use jyotish_session::{canonical_hash, SessionCache};
use jyotish_store::{IndexSnapshot, StoreEngine};
use jyotish_tokens::SessionBudget;

use crate::predictor::Predictor;
use crate::router::Router;
use crate::synthesizer::{self, Synthesizer};
use crate::verifier::Verifier;

struct DomainRun {
    domain: Domain,
    ranked: Vec<RankedRule>,
    retrieval_degraded: bool,
    prediction: Option<Prediction>,
    issues: Vec<String>,
}

/// The assembled pipeline. Every collaborator is an explicit field;
/// nothing reaches through a global registry.
pub struct Pipeline {
    store: Arc<StoreEngine>,
    retriever: RetrieverEngine,
    reasoner: Arc<dyn IReasoner>,
    cache: SessionCache,
    config: JyotishConfig,
}

impl Pipeline {
    pub fn new(
        store: Arc<StoreEngine>,
        retriever: RetrieverEngine,
        reasoner: Arc<dyn IReasoner>,
        config: JyotishConfig,
    ) -> Self {
        let cache = SessionCache::new(&config.cache);
        Self {
            store,
            retriever,
            reasoner,
            cache,
            config,
        }
    }

    /// Drop cached results for one profile, e.g. after a chart update.
    pub fn invalidate_profile(&self, profile_id: &str) -> usize {
        self.cache.invalidate_profile(profile_id)
    }

    /// Serve one interpretation request, from cache when possible.
    pub fn interpret(
        &self,
        request: &InterpretRequest,
        chart: &ChartFacts,
    ) -> JyotishResult<PipelineResult> {
        if chart.profile_id != request.profile_id {
            return Err(JyotishError::Validation {
                reason: format!(
                    "chart belongs to {}, request names {}",
                    chart.profile_id, request.profile_id
                ),
            });
        }
        if chart.chart_version != request.chart_version {
            return Err(JyotishError::Validation {
                reason: format!(
                    "chart version {} does not match requested version {}",
                    chart.chart_version, request.chart_version
                ),
            });
        }

        let hash = canonical_hash(request);
        let cached = self.cache.get_or_compute(
            &hash,
            &request.profile_id,
            request.force_regenerate,
            || self.run(request, chart, &hash),
        )?;

        let mut result = (*cached.result).clone();
        result.cache = cached.meta;
        Ok(result)
    }

    fn run(
        &self,
        request: &InterpretRequest,
        chart: &ChartFacts,
        hash: &str,
    ) -> JyotishResult<PipelineResult> {
        let budget = SessionBudget::new(self.config.budget.clone());
        let mut issues: Vec<String> = Vec::new();
        let mut degraded = false;

        // Stage 1: router, skipped when the caller chose the domains.
        let domains = match caller_domains(request) {
            Some(domains) => domains,
            None => match budget.try_begin(Stage::Router) {
                Ok(max_tokens) => {
                    let out = Router::new(self.reasoner.as_ref()).route(
                        request.query_text.as_deref(),
                        chart,
                        max_tokens,
                    );
                    budget.record(Stage::Router, out.tokens);
                    if let Some(issue) = out.issue {
                        issues.push(issue);
                        degraded = true;
                    }
                    out.domains
                }
                Err(e) => {
                    warn!(error = %e, "router skipped");
                    issues.push(format!("router skipped: {e}"));
                    degraded = true;
                    vec![Domain::General]
                }
            },
        };

        // Stage 2: per-domain retrieval and prediction against one
        // pinned snapshot. Prediction shares one stage allowance split
        // evenly across domains, and is admitted before the fan-out so
        // an over-budget stage never partially executes.
        let snapshot = self.store.snapshot();
        let per_domain_tokens = if request.include_predictions {
            match budget.try_begin(Stage::Prediction) {
                Ok(allowance) => Some(allowance / domains.len().max(1)),
                Err(e) => {
                    warn!(error = %e, "predictions skipped");
                    issues.push(format!("predictions skipped: {e}"));
                    degraded = true;
                    None
                }
            }
        } else {
            None
        };

        let window_months = if request.window_months == 0 {
            self.config.prediction.default_window_months
        } else {
            request.window_months
        };

        let runs: Vec<DomainRun> = thread::scope(|s| {
            let handles: Vec<_> = domains
                .iter()
                .map(|&domain| {
                    let snapshot = &snapshot;
                    let budget = &budget;
                    s.spawn(move || {
                        self.run_domain(
                            domain,
                            chart,
                            request,
                            snapshot,
                            budget,
                            per_domain_tokens,
                            window_months,
                        )
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("domain task panicked"))
                .collect()
        });

        let mut domain_analyses = Vec::with_capacity(runs.len());
        let mut per_domain: Vec<(Domain, Vec<RankedRule>)> = Vec::with_capacity(runs.len());
        let mut predictions = Vec::new();
        let mut rules_used: BTreeSet<String> = BTreeSet::new();
        for run in runs {
            degraded |= run.retrieval_degraded;
            degraded |= per_domain_tokens.is_some() && run.prediction.is_none();
            issues.extend(run.issues);
            rules_used.extend(run.ranked.iter().map(|r| r.rule.id.clone()));
            domain_analyses.push(DomainAnalysis {
                domain: run.domain,
                rules: run.ranked.iter().map(citation).collect(),
                degraded: run.retrieval_degraded,
            });
            if let Some(prediction) = run.prediction {
                predictions.push(prediction);
            }
            per_domain.push((run.domain, run.ranked));
        }
        let rules_used: Vec<String> = rules_used.into_iter().collect();

        // Stage 3: synthesis.
        let interpretation = match budget.try_begin(Stage::Synthesis) {
            Ok(max_tokens) => {
                let out = Synthesizer::new(self.reasoner.as_ref()).synthesize(
                    chart,
                    request.query_text.as_deref(),
                    &per_domain,
                    &predictions,
                    max_tokens,
                );
                budget.record(Stage::Synthesis, out.tokens);
                issues.extend(out.issues);
                degraded |= out.degraded;
                out.interpretation
            }
            Err(e) => {
                warn!(error = %e, "synthesis skipped, composing locally");
                issues.push(format!("synthesis skipped: {e}"));
                degraded = true;
                synthesizer::compose_fallback(&per_domain, &predictions)
            }
        };

        // Stage 4: verification. Local and token-free, but still gated
        // so an exhausted run truncates cleanly.
        let verification = match budget.try_begin(Stage::Verification) {
            Ok(_) => Some(Verifier::new(&self.config.verifier).verify(
                &interpretation,
                &rules_used,
                &domains,
            )),
            Err(e) => {
                issues.push(format!("verification skipped: {e}"));
                degraded = true;
                None
            }
        };

        let usage = budget.report();
        info!(
            hash,
            domains = domains.len(),
            rules = rules_used.len(),
            tokens = usage.total,
            degraded,
            "pipeline run complete"
        );

        Ok(PipelineResult {
            canonical_hash: hash.to_string(),
            request: request.clone(),
            interpretation,
            domain_analyses,
            predictions,
            rules_used,
            verification,
            usage,
            // Placeholder; `interpret` overwrites this with the real
            // cache bookkeeping for each access.
            cache: CacheMeta {
                cache_hit: false,
                access_count: 0,
                created_at: Utc::now(),
                last_accessed: Utc::now(),
            },
            degraded,
            issues,
            generated_at: Utc::now(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn run_domain(
        &self,
        domain: Domain,
        chart: &ChartFacts,
        request: &InterpretRequest,
        snapshot: &IndexSnapshot,
        budget: &SessionBudget,
        prediction_tokens: Option<usize>,
        window_months: u32,
    ) -> DomainRun {
        let mut issues = Vec::new();

        let query = QueryContext {
            chart: Some(chart.clone()),
            query_text: request.query_text.clone(),
            domain: Some(domain),
            scope: None,
            limit: self.config.retrieval.default_limit,
            min_weight: self.config.retrieval.default_min_weight,
        };
        let (ranked, retrieval_degraded) = match self.retriever.retrieve_from(snapshot, &query) {
            Ok(outcome) => (outcome.results, outcome.degraded),
            Err(e) => {
                warn!(%domain, error = %e, "retrieval failed for domain");
                issues.push(format!("retrieval failed for {domain}: {e}"));
                (Vec::new(), true)
            }
        };

        let prediction = prediction_tokens.and_then(|max_tokens| {
            let out = Predictor::new(self.reasoner.as_ref(), &self.config.prediction).predict(
                domain,
                chart,
                window_months,
                request.include_transits,
                max_tokens,
            );
            budget.record(Stage::Prediction, out.tokens);
            issues.extend(out.issues);
            out.prediction
        });

        DomainRun {
            domain,
            ranked,
            retrieval_degraded,
            prediction,
            issues,
        }
    }
}

/// Caller-supplied domains, deduplicated with order preserved. `None`
/// when the router must decide.
fn caller_domains(request: &InterpretRequest) -> Option<Vec<Domain>> {
    let supplied = request.domains.as_ref()?;
    let mut domains: Vec<Domain> = Vec::new();
    for &domain in supplied {
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    (!domains.is_empty()).then_some(domains)
}

fn citation(ranked: &RankedRule) -> RuleCitation {
    RuleCitation {
        rule_id: ranked.rule.id.clone(),
        source: ranked.rule.source.clone(),
        relevance: ranked.relevance,
        weight: ranked.rule.weight.value(),
    }
}
