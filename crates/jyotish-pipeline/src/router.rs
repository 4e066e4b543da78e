//! Domain router: one bounded classification call.

use serde::Deserialize;
use tracing::{debug, warn};

use jyotish_core::chart::ChartFacts;
use jyotish_core::rule::Domain;
use jyotish_core::traits::{CompletionRequest, IReasoner};

use crate::parse;

const SYSTEM: &str = "You classify jyotish consultation queries into life domains. \
Answer with JSON only: {\"domains\": [...]}. Allowed values: career, marriage, \
wealth, health, education, children, spirituality, general.";

#[derive(Deserialize)]
struct RouterResponse {
    domains: Vec<String>,
}

/// What routing produced: a non-empty domain list, the tokens it cost,
/// and an issue when the strict output contract was not honored.
pub struct RouterOutput {
    pub domains: Vec<Domain>,
    pub tokens: usize,
    pub issue: Option<String>,
}

impl RouterOutput {
    fn fallback(tokens: usize, reason: String) -> Self {
        Self {
            domains: vec![Domain::General],
            tokens,
            issue: Some(reason),
        }
    }
}

pub struct Router<'a> {
    reasoner: &'a dyn IReasoner,
}

impl<'a> Router<'a> {
    pub fn new(reasoner: &'a dyn IReasoner) -> Self {
        Self { reasoner }
    }

    /// Classify the query. Never fails: any transport or contract
    /// violation falls back to `[general]` with an issue attached.
    pub fn route(
        &self,
        query_text: Option<&str>,
        chart: &ChartFacts,
        max_tokens: usize,
    ) -> RouterOutput {
        let mut prompt = format!("Chart: {}.\n", chart.summary());
        match query_text {
            Some(q) => prompt.push_str(&format!("Question: {q}\n")),
            None => prompt.push_str("No specific question; a general reading was requested.\n"),
        }
        prompt.push_str("Which domains does this query concern?");

        let request = CompletionRequest {
            stage: "router",
            system: SYSTEM.to_string(),
            prompt,
            max_tokens,
        };

        let completion = match self.reasoner.complete(&request) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "router call failed, defaulting to general");
                return RouterOutput::fallback(0, format!("router unavailable: {e}"));
            }
        };

        match parse::from_response::<RouterResponse>("router", &completion.text) {
            Ok(parsed) => {
                let mut domains: Vec<Domain> = Vec::new();
                for label in &parsed.domains {
                    if let Ok(domain) = label.parse() {
                        if !domains.contains(&domain) {
                            domains.push(domain);
                        }
                    }
                }
                if domains.is_empty() {
                    return RouterOutput::fallback(
                        completion.tokens_used,
                        "router returned no recognizable domain".to_string(),
                    );
                }
                debug!(?domains, "query routed");
                RouterOutput {
                    domains,
                    tokens: completion.tokens_used,
                    issue: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "router output unparsable, defaulting to general");
                RouterOutput::fallback(completion.tokens_used, format!("router output ignored: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jyotish_core::errors::{GenerationError, JyotishResult};
    use jyotish_core::traits::Completion;
    use test_fixtures::capricorn_sun_chart;

    struct Scripted(&'static str);

    impl IReasoner for Scripted {
        fn complete(&self, _request: &CompletionRequest) -> JyotishResult<Completion> {
            Ok(Completion {
                text: self.0.to_string(),
                tokens_used: 30,
            })
        }
    }

    struct Failing;

    impl IReasoner for Failing {
        fn complete(&self, _request: &CompletionRequest) -> JyotishResult<Completion> {
            Err(GenerationError::Timeout { seconds: 20 }.into())
        }
    }

    #[test]
    fn parses_in_set_labels() {
        let reasoner = Scripted("{\"domains\": [\"career\", \"wealth\"]}");
        let out = Router::new(&reasoner).route(Some("job change?"), &capricorn_sun_chart(), 400);
        assert_eq!(out.domains, vec![Domain::Career, Domain::Wealth]);
        assert!(out.issue.is_none());
    }

    #[test]
    fn out_of_set_labels_are_dropped() {
        let reasoner = Scripted("{\"domains\": [\"career\", \"weather\"]}");
        let out = Router::new(&reasoner).route(None, &capricorn_sun_chart(), 400);
        assert_eq!(out.domains, vec![Domain::Career]);
    }

    #[test]
    fn unparsable_output_falls_back_to_general() {
        let reasoner = Scripted("definitely career related I would say");
        let out = Router::new(&reasoner).route(None, &capricorn_sun_chart(), 400);
        assert_eq!(out.domains, vec![Domain::General]);
        assert!(out.issue.is_some());
    }

    #[test]
    fn transport_failure_falls_back_to_general() {
        let out = Router::new(&Failing).route(None, &capricorn_sun_chart(), 400);
        assert_eq!(out.domains, vec![Domain::General]);
        assert_eq!(out.tokens, 0);
    }
}
