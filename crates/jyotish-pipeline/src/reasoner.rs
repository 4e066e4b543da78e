//! HTTP client for the external reasoning collaborator.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use jyotish_core::config::ReasonerConfig;
use jyotish_core::errors::{GenerationError, JyotishError, JyotishResult};
use jyotish_core::traits::{Completion, CompletionRequest, IReasoner};
use jyotish_tokens::TokenCounter;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: usize,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}

/// Blocking completion client with an explicit per-request timeout.
/// A timeout degrades only the calling stage, so the error carries
/// enough for the orchestrator to log and move on.
pub struct HttpReasoner {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    timeout_secs: u64,
    counter: TokenCounter,
}

impl HttpReasoner {
    pub fn new(config: &ReasonerConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            counter: TokenCounter::new(),
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> JyotishError {
        if e.is_timeout() {
            GenerationError::Timeout {
                seconds: self.timeout_secs,
            }
            .into()
        } else {
            GenerationError::RequestFailed {
                reason: e.to_string(),
            }
            .into()
        }
    }
}

impl IReasoner for HttpReasoner {
    fn complete(&self, request: &CompletionRequest) -> JyotishResult<Completion> {
        let body = GenerateRequest {
            model: &self.model,
            system: &request.system,
            prompt: &request.prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: request.max_tokens,
            },
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| self.transport_error(e))?
            .error_for_status()
            .map_err(|e| self.transport_error(e))?;

        let parsed: GenerateResponse =
            response.json().map_err(|e| GenerationError::RequestFailed {
                reason: format!("malformed completion response: {e}"),
            })?;

        // Prefer the collaborator's own accounting; fall back to local
        // counting when it reports none.
        let tokens_used = match (parsed.prompt_eval_count, parsed.eval_count) {
            (Some(p), Some(e)) => p + e,
            _ => {
                self.counter.count_cached(&request.prompt)
                    + self.counter.count_cached(&request.system)
                    + self.counter.count_cached(&parsed.response)
            }
        };
        debug!(stage = request.stage, tokens_used, "completion returned");

        Ok(Completion {
            text: parsed.response,
            tokens_used,
        })
    }
}
