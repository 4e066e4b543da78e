use serde::{Deserialize, Serialize};

/// Overall confidence band for a verified interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

/// Citation audit numbers. `valid <= total`, and total never exceeds the
/// number of distinct bracketed ids found in the narrative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationMetrics {
    /// Distinct bracketed ids found in the narrative.
    pub total: usize,
    /// Ids that resolve into the supplied rule set.
    pub valid: usize,
    /// Ids that do not resolve.
    pub invalid: usize,
    /// valid / total, or 1.0 when nothing was cited.
    pub accuracy: f64,
}

/// Advisory audit of a synthesized interpretation. Never blocks the
/// result; low scores are surfaced for the caller to act on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// 0–10.
    pub quality_score: f64,
    pub overall_confidence: ConfidenceBand,
    pub issues: Vec<String>,
    /// Opposite claims about the same chart factor.
    pub contradictions: Vec<String>,
    pub suggestions: Vec<String>,
    pub citations: CitationMetrics,
}
