use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rule::Domain;

use super::prediction::Prediction;
use super::verification_report::VerificationReport;

/// The caller-facing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretRequest {
    pub profile_id: String,
    pub chart_version: u32,
    #[serde(default)]
    pub query_text: Option<String>,
    /// When set, the router is skipped entirely.
    #[serde(default)]
    pub domains: Option<Vec<Domain>>,
    pub include_predictions: bool,
    #[serde(default)]
    pub include_transits: bool,
    pub window_months: u32,
    #[serde(default)]
    pub force_regenerate: bool,
}

/// Token-consuming pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Router,
    Prediction,
    Synthesis,
    Verification,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Router => "router",
            Stage::Prediction => "prediction",
            Stage::Synthesis => "synthesis",
            Stage::Verification => "verification",
        }
    }
}

/// Per-stage token accounting for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageReport {
    pub per_stage: BTreeMap<Stage, usize>,
    pub total: usize,
    pub ceiling: usize,
}

/// Cache bookkeeping attached to every result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub cache_hit: bool,
    pub access_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

/// A rule as cited inside a domain analysis: enough for the caller to
/// render provenance without refetching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCitation {
    pub rule_id: String,
    pub source: String,
    pub relevance: f64,
    pub weight: f64,
}

/// Per-domain retrieval summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainAnalysis {
    pub domain: Domain,
    pub rules: Vec<RuleCitation>,
    /// True when this domain's retrieval fell back to symbolic-only.
    pub degraded: bool,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Stable digest of the normalized request parameters.
    pub canonical_hash: String,
    pub request: InterpretRequest,
    /// The cited narrative.
    pub interpretation: String,
    pub domain_analyses: Vec<DomainAnalysis>,
    pub predictions: Vec<Prediction>,
    /// Distinct rule ids supplied to the synthesizer.
    pub rules_used: Vec<String>,
    pub verification: Option<VerificationReport>,
    pub usage: UsageReport,
    pub cache: CacheMeta,
    /// True when any stage degraded or was skipped.
    pub degraded: bool,
    pub issues: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
