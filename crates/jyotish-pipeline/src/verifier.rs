//! Advisory audit of the synthesized interpretation.
//!
//! Fully local and deterministic: citation accounting, a contradiction
//! scan over opposing claims about the same chart factor, a tone check
//! for fatalistic phrasing, and per-domain completeness. The report
//! never blocks a result.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use jyotish_core::config::VerifierConfig;
use jyotish_core::models::{CitationMetrics, ConfidenceBand, VerificationReport};
use jyotish_core::rule::Domain;

use crate::synthesizer::citation_re;

const POSITIVE: &[&str] = &[
    "gain",
    "gains",
    "success",
    "favorable",
    "auspicious",
    "strong",
    "prosperity",
    "rise",
    "supportive",
    "blessing",
];

const NEGATIVE: &[&str] = &[
    "loss",
    "losses",
    "failure",
    "unfavorable",
    "inauspicious",
    "weak",
    "decline",
    "obstacles",
    "affliction",
    "struggle",
];

const ABSOLUTIST: &[&str] = &[
    "will certainly",
    "will definitely",
    "inevitably",
    "guaranteed",
    "doomed",
    "cannot avoid",
    "certain to",
    "without fail",
];

const PLANETS: &[&str] = &[
    "sun", "moon", "mars", "mercury", "jupiter", "venus", "saturn", "rahu", "ketu",
];

fn house_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)?\s+house\b").expect("house mention pattern")
    })
}

pub struct Verifier<'a> {
    config: &'a VerifierConfig,
}

impl<'a> Verifier<'a> {
    pub fn new(config: &'a VerifierConfig) -> Self {
        Self { config }
    }

    pub fn verify(
        &self,
        interpretation: &str,
        rules_used: &[String],
        requested_domains: &[Domain],
    ) -> VerificationReport {
        let citations = self.citation_metrics(interpretation, rules_used);
        let contradictions = contradiction_scan(interpretation);
        let tone_flags = tone_scan(interpretation);
        let missing = missing_domains(interpretation, requested_domains);

        let mut issues = Vec::new();
        let mut suggestions = Vec::new();
        if citations.invalid > 0 {
            issues.push(format!(
                "{} citation(s) do not resolve into the rule set",
                citations.invalid
            ));
        }
        for phrase in &tone_flags {
            issues.push(format!("absolutist phrasing: \"{phrase}\""));
            suggestions.push(format!(
                "soften \"{phrase}\" into a tendency rather than a certainty"
            ));
        }
        for domain in &missing {
            issues.push(format!("requested domain {domain} is never addressed"));
            suggestions.push(format!("add a section covering {domain}"));
        }
        if citations.total == 0 && !rules_used.is_empty() {
            suggestions.push("cite the matched rules inline to ground the claims".to_string());
        }

        let mut quality = 10.0;
        quality -= citations.invalid as f64;
        quality -= 1.5 * contradictions.len() as f64;
        quality -= 0.5 * tone_flags.len() as f64;
        quality -= missing.len() as f64;
        let quality_score = quality.clamp(0.0, 10.0);

        let overall_confidence = if quality_score >= self.config.quality_high
            && citations.accuracy >= self.config.accuracy_high
        {
            ConfidenceBand::High
        } else if quality_score >= self.config.quality_medium
            && citations.accuracy >= self.config.accuracy_medium
        {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        };

        debug!(
            quality_score,
            accuracy = citations.accuracy,
            ?overall_confidence,
            "verification complete"
        );

        VerificationReport {
            quality_score,
            overall_confidence,
            issues,
            contradictions,
            suggestions,
            citations,
        }
    }

    fn citation_metrics(&self, interpretation: &str, rules_used: &[String]) -> CitationMetrics {
        let known: BTreeSet<&str> = rules_used.iter().map(String::as_str).collect();
        let cited: BTreeSet<&str> = citation_re()
            .captures_iter(interpretation)
            .map(|c| c.get(1).map_or("", |m| m.as_str()))
            .collect();

        let total = cited.len();
        let valid = cited.iter().filter(|id| known.contains(*id)).count();
        let invalid = total - valid;
        let accuracy = if total == 0 {
            1.0
        } else {
            valid as f64 / total as f64
        };
        CitationMetrics {
            total,
            valid,
            invalid,
            accuracy,
        }
    }
}

/// Chart factors mentioned in one sentence: planet names and house
/// numbers.
fn factors(sentence: &str) -> Vec<String> {
    let mut found = Vec::new();
    for planet in PLANETS {
        if sentence.contains(planet) {
            found.push((*planet).to_string());
        }
    }
    for cap in house_re().captures_iter(sentence) {
        found.push(format!("house {}", &cap[1]));
    }
    found
}

/// Opposite-polarity claims about the same factor across sentences.
fn contradiction_scan(interpretation: &str) -> Vec<String> {
    // factor → (saw positive, saw negative)
    let mut polarity: BTreeMap<String, (bool, bool)> = BTreeMap::new();
    for sentence in interpretation.split(['.', '!', '?', '\n']) {
        let lower = sentence.to_lowercase();
        let positive = POSITIVE.iter().any(|w| lower.contains(w));
        let negative = NEGATIVE.iter().any(|w| lower.contains(w));
        if !positive && !negative {
            continue;
        }
        for factor in factors(&lower) {
            let entry = polarity.entry(factor).or_insert((false, false));
            entry.0 |= positive;
            entry.1 |= negative;
        }
    }
    polarity
        .into_iter()
        .filter(|(_, (pos, neg))| *pos && *neg)
        .map(|(factor, _)| format!("conflicting claims about {factor}"))
        .collect()
}

fn tone_scan(interpretation: &str) -> Vec<String> {
    let lower = interpretation.to_lowercase();
    ABSOLUTIST
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .map(|phrase| (*phrase).to_string())
        .collect()
}

fn missing_domains(interpretation: &str, requested: &[Domain]) -> Vec<Domain> {
    let lower = interpretation.to_lowercase();
    requested
        .iter()
        .filter(|d| !lower.contains(d.as_str()))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify(interpretation: &str, rules: &[&str], domains: &[Domain]) -> VerificationReport {
        let config = VerifierConfig::default();
        let rules: Vec<String> = rules.iter().map(|s| s.to_string()).collect();
        Verifier::new(&config).verify(interpretation, &rules, domains)
    }

    #[test]
    fn clean_text_lands_in_the_high_band() {
        let report = verify(
            "Career prospects look favorable, with gains through authority [R1]. \
             The Sun tends to support visibility here [R2].",
            &["R1", "R2"],
            &[Domain::Career],
        );
        assert_eq!(report.citations.total, 2);
        assert_eq!(report.citations.valid, 2);
        assert_eq!(report.citations.accuracy, 1.0);
        assert!(report.contradictions.is_empty());
        assert_eq!(report.overall_confidence, ConfidenceBand::High);
    }

    #[test]
    fn unresolved_citations_lower_accuracy_and_quality() {
        let report = verify(
            "Career gains are indicated [R1] and wealth follows [R7] [R8].",
            &["R1"],
            &[Domain::Career],
        );
        assert_eq!(report.citations.total, 3);
        assert_eq!(report.citations.valid, 1);
        assert_eq!(report.citations.invalid, 2);
        assert!(report.citations.accuracy < 0.5);
        assert_ne!(report.overall_confidence, ConfidenceBand::High);
    }

    #[test]
    fn opposing_claims_about_one_factor_are_contradictions() {
        let report = verify(
            "Saturn brings career gains through patience. \
             Later, Saturn causes heavy losses in career standing.",
            &[],
            &[Domain::Career],
        );
        assert_eq!(report.contradictions.len(), 1);
        assert!(report.contradictions[0].contains("saturn"));
    }

    #[test]
    fn fatalistic_phrasing_is_flagged_with_a_suggestion() {
        let report = verify(
            "You are doomed in career matters and will certainly fail.",
            &[],
            &[Domain::Career],
        );
        assert!(report.issues.iter().any(|i| i.contains("doomed")));
        assert!(!report.suggestions.is_empty());
    }

    #[test]
    fn unaddressed_domains_are_reported() {
        let report = verify(
            "Career rises steadily through the year.",
            &[],
            &[Domain::Career, Domain::Health],
        );
        assert!(report
            .issues
            .iter()
            .any(|i| i.contains("health") && i.contains("never addressed")));
    }

    #[test]
    fn uncited_text_with_no_rules_keeps_full_accuracy() {
        let report = verify("A quiet, steady period.", &[], &[]);
        assert_eq!(report.citations.accuracy, 1.0);
        assert_eq!(report.citations.total, 0);
    }
}
