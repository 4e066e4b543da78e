//! Cited narrative composition.
//!
//! The synthesizer asks the reasoner for a narrative in which every
//! rule-grounded claim carries an inline `[rule-id]` marker, then
//! enforces the contract locally: bracketed ids that are not in the
//! supplied rule set are stripped before the narrative leaves the
//! stage. When the reasoner is unreachable, a deterministic local
//! composition keeps the run alive.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use jyotish_core::chart::ChartFacts;
use jyotish_core::models::{Prediction, RankedRule};
use jyotish_core::rule::Domain;
use jyotish_core::traits::{CompletionRequest, IReasoner};

const SYSTEM: &str = "You are a jyotish interpreter writing for a thoughtful reader. \
Compose one flowing interpretation from the chart, the cited classical rules, and any \
forecasts. Every claim grounded in a rule must carry its id inline in square brackets, \
e.g. [BPHS-9.12]. Never invent rule ids. Target 400-600 words per domain. Use measured, \
non-fatalistic language.";

pub(crate) fn citation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([A-Za-z0-9][A-Za-z0-9_.:\-]*)\]").expect("citation pattern"))
}

/// The synthesized narrative plus spend and issues.
pub struct SynthesisOutput {
    pub interpretation: String,
    pub tokens: usize,
    pub issues: Vec<String>,
    /// True when the reasoner failed and the local fallback composed
    /// the narrative instead.
    pub degraded: bool,
}

pub struct Synthesizer<'a> {
    reasoner: &'a dyn IReasoner,
}

impl<'a> Synthesizer<'a> {
    pub fn new(reasoner: &'a dyn IReasoner) -> Self {
        Self { reasoner }
    }

    pub fn synthesize(
        &self,
        chart: &ChartFacts,
        query_text: Option<&str>,
        per_domain: &[(Domain, Vec<RankedRule>)],
        predictions: &[Prediction],
        max_tokens: usize,
    ) -> SynthesisOutput {
        let allowed: BTreeSet<&str> = per_domain
            .iter()
            .flat_map(|(_, rules)| rules.iter().map(|r| r.rule.id.as_str()))
            .collect();

        let request = CompletionRequest {
            stage: "synthesis",
            system: SYSTEM.to_string(),
            prompt: self.prompt(chart, query_text, per_domain, predictions),
            max_tokens,
        };

        match self.reasoner.complete(&request) {
            Ok(completion) => {
                let (interpretation, stripped) = enforce_citations(&completion.text, &allowed);
                let mut issues = Vec::new();
                if stripped > 0 {
                    issues.push(format!("{stripped} uncited rule markers stripped"));
                }
                SynthesisOutput {
                    interpretation,
                    tokens: completion.tokens_used,
                    issues,
                    degraded: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "synthesis call failed, composing locally");
                SynthesisOutput {
                    interpretation: compose_fallback(per_domain, predictions),
                    tokens: 0,
                    issues: vec![format!("synthesizer unavailable, local composition: {e}")],
                    degraded: true,
                }
            }
        }
    }

    fn prompt(
        &self,
        chart: &ChartFacts,
        query_text: Option<&str>,
        per_domain: &[(Domain, Vec<RankedRule>)],
        predictions: &[Prediction],
    ) -> String {
        let mut prompt = format!("Chart: {}.\n", chart.summary());
        if let Some(q) = query_text {
            prompt.push_str(&format!("Question: {q}\n"));
        }
        for (domain, rules) in per_domain {
            prompt.push_str(&format!("\nRules for {domain}:\n"));
            for ranked in rules {
                let rule = &ranked.rule;
                prompt.push_str(&format!(
                    "- [{}] when {}, then {} (source {}, weight {})\n",
                    rule.id, rule.condition, rule.effect, rule.source, rule.weight
                ));
            }
        }
        for prediction in predictions {
            prompt.push_str(&format!(
                "\nForecast for {}: {} (confidence {}/100)\n",
                prediction.domain, prediction.summary, prediction.confidence_score
            ));
        }
        prompt.push_str("\nWrite the interpretation now.");
        prompt
    }
}

/// Remove bracketed markers that do not resolve into the rule set.
/// Returns the cleaned text and how many markers were removed.
fn enforce_citations(text: &str, allowed: &BTreeSet<&str>) -> (String, usize) {
    let mut stripped = 0usize;
    let cleaned = citation_re().replace_all(text, |caps: &regex::Captures<'_>| {
        if allowed.contains(&caps[1]) {
            caps[0].to_string()
        } else {
            stripped += 1;
            String::new()
        }
    });
    (cleaned.into_owned(), stripped)
}

/// Deterministic narrative assembled straight from the rule set, used
/// when the reasoner cannot be reached.
pub(crate) fn compose_fallback(
    per_domain: &[(Domain, Vec<RankedRule>)],
    predictions: &[Prediction],
) -> String {
    let mut out = String::new();
    for (domain, rules) in per_domain {
        out.push_str(&format!("On {domain}: "));
        if rules.is_empty() {
            out.push_str("no classical rules matched this chart.\n");
            continue;
        }
        for ranked in rules {
            let rule = &ranked.rule;
            out.push_str(&format!("{} [{}]. ", rule.effect, rule.id));
        }
        out.push('\n');
    }
    for prediction in predictions {
        out.push_str(&format!(
            "Forecast for {}: {}\n",
            prediction.domain, prediction.summary
        ));
    }
    out
}
