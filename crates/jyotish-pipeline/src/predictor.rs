//! Per-domain forecast generation.

use serde::Deserialize;
use tracing::{debug, warn};

use jyotish_core::chart::ChartFacts;
use jyotish_core::config::PredictionConfig;
use jyotish_core::models::{ConfidenceLevel, Intensity, KeyPeriod, Prediction};
use jyotish_core::rule::Domain;
use jyotish_core::traits::{CompletionRequest, IReasoner};

use crate::parse;

const SYSTEM: &str = "You are a jyotish forecaster. Given chart facts and a domain, \
produce a time-windowed forecast. Answer with JSON only: {\"summary\": \"...\", \
\"key_periods\": [{\"label\": \"months 1-3\", \"event\": \"...\", \"intensity\": \
\"low|moderate|high\"}], \"confidence_score\": 0-100, \"reasoning\": \"...\"}.";

#[derive(Deserialize)]
struct RawPrediction {
    summary: String,
    #[serde(default)]
    key_periods: Vec<RawPeriod>,
    confidence_score: f64,
    #[serde(default)]
    reasoning: String,
}

#[derive(Deserialize)]
struct RawPeriod {
    label: String,
    event: String,
    #[serde(default)]
    intensity: String,
}

/// One domain's forecast attempt: the prediction when parsing
/// succeeded within the retry allowance, plus spend and issues.
pub struct PredictionOutput {
    pub prediction: Option<Prediction>,
    pub tokens: usize,
    pub issues: Vec<String>,
}

pub struct Predictor<'a> {
    reasoner: &'a dyn IReasoner,
    config: &'a PredictionConfig,
}

impl<'a> Predictor<'a> {
    pub fn new(reasoner: &'a dyn IReasoner, config: &'a PredictionConfig) -> Self {
        Self { reasoner, config }
    }

    /// Forecast one domain. A transport failure or a persistent parse
    /// failure yields `prediction: None` with issues, never an error.
    pub fn predict(
        &self,
        domain: Domain,
        chart: &ChartFacts,
        window_months: u32,
        include_transits: bool,
        max_tokens: usize,
    ) -> PredictionOutput {
        let mut tokens = 0usize;
        let mut issues = Vec::new();
        let mut prompt = self.prompt(domain, chart, window_months, include_transits);

        // First attempt plus bounded corrective re-prompts.
        for attempt in 0..=self.config.parse_retries {
            let request = CompletionRequest {
                stage: "prediction",
                system: SYSTEM.to_string(),
                prompt: prompt.clone(),
                max_tokens,
            };
            let completion = match self.reasoner.complete(&request) {
                Ok(c) => c,
                Err(e) => {
                    warn!(%domain, error = %e, "prediction call failed");
                    issues.push(format!("prediction for {domain} unavailable: {e}"));
                    return PredictionOutput {
                        prediction: None,
                        tokens,
                        issues,
                    };
                }
            };
            tokens += completion.tokens_used;

            match parse::from_response::<RawPrediction>("prediction", &completion.text) {
                Ok(raw) => {
                    debug!(%domain, attempt, "prediction parsed");
                    return PredictionOutput {
                        prediction: Some(self.finish(domain, raw)),
                        tokens,
                        issues,
                    };
                }
                Err(e) => {
                    warn!(%domain, attempt, error = %e, "prediction output unparsable");
                    prompt = format!(
                        "Your previous answer was not valid JSON ({e}). Answer again, \
                         strictly as the JSON object described.\n\n{prompt}"
                    );
                }
            }
        }

        issues.push(format!(
            "prediction for {domain} dropped after {} unparsable responses",
            self.config.parse_retries as usize + 1
        ));
        PredictionOutput {
            prediction: None,
            tokens,
            issues,
        }
    }

    fn prompt(
        &self,
        domain: Domain,
        chart: &ChartFacts,
        window_months: u32,
        include_transits: bool,
    ) -> String {
        let houses: Vec<String> = domain.houses().iter().map(|h| h.to_string()).collect();
        let mut prompt = format!(
            "Chart: {}.\nDomain: {} (houses {}).\nForecast window: the next {} months.\n",
            chart.summary(),
            domain,
            houses.join(", "),
            window_months,
        );
        if include_transits {
            prompt.push_str("Weigh current transit influences alongside the running dasha.\n");
        }
        prompt.push_str("Produce the forecast.");
        prompt
    }

    fn finish(&self, domain: Domain, raw: RawPrediction) -> Prediction {
        let key_periods = raw
            .key_periods
            .into_iter()
            .map(|p| KeyPeriod {
                label: p.label,
                event: p.event,
                intensity: match p.intensity.to_lowercase().as_str() {
                    "low" => Intensity::Low,
                    "high" => Intensity::High,
                    _ => Intensity::Moderate,
                },
            })
            .collect();
        let confidence_score = raw.confidence_score.clamp(0.0, 100.0).round() as u8;
        Prediction {
            domain,
            summary: raw.summary,
            key_periods,
            confidence_score,
            confidence_level: ConfidenceLevel::from_score(confidence_score, &self.config.thresholds),
            reasoning: raw.reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use jyotish_core::errors::JyotishResult;
    use jyotish_core::traits::Completion;
    use test_fixtures::capricorn_sun_chart;

    struct Sequenced {
        responses: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl Sequenced {
        fn new(responses: Vec<&'static str>) -> Self {
            Self {
                responses,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl IReasoner for Sequenced {
        fn complete(&self, _request: &CompletionRequest) -> JyotishResult<Completion> {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Completion {
                text: self.responses[i.min(self.responses.len() - 1)].to_string(),
                tokens_used: 100,
            })
        }
    }

    const GOOD: &str = r#"{"summary": "steady professional rise", "key_periods":
        [{"label": "months 3-5", "event": "recognition at work", "intensity": "high"}],
        "confidence_score": 80, "reasoning": "10th lord well placed"}"#;

    #[test]
    fn parses_a_well_formed_forecast() {
        let reasoner = Sequenced::new(vec![GOOD]);
        let config = PredictionConfig::default();
        let out = Predictor::new(&reasoner, &config).predict(
            Domain::Career,
            &capricorn_sun_chart(),
            12,
            false,
            2000,
        );

        let p = out.prediction.expect("prediction");
        assert_eq!(p.domain, Domain::Career);
        assert_eq!(p.confidence_score, 80);
        assert_eq!(p.confidence_level, ConfidenceLevel::High);
        assert_eq!(p.key_periods.len(), 1);
        assert_eq!(p.key_periods[0].intensity, Intensity::High);
        assert!(out.issues.is_empty());
    }

    #[test]
    fn retries_once_then_succeeds() {
        let reasoner = Sequenced::new(vec!["looking good this year!", GOOD]);
        let config = PredictionConfig::default();
        let out = Predictor::new(&reasoner, &config).predict(
            Domain::Career,
            &capricorn_sun_chart(),
            12,
            false,
            2000,
        );

        assert!(out.prediction.is_some());
        assert_eq!(reasoner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(out.tokens, 200);
    }

    #[test]
    fn persistent_parse_failure_drops_the_domain_with_an_issue() {
        let reasoner = Sequenced::new(vec!["nope", "still nope"]);
        let config = PredictionConfig::default();
        let out = Predictor::new(&reasoner, &config).predict(
            Domain::Wealth,
            &capricorn_sun_chart(),
            12,
            false,
            2000,
        );

        assert!(out.prediction.is_none());
        assert_eq!(out.issues.len(), 1);
        assert!(out.issues[0].contains("wealth"));
    }
}
