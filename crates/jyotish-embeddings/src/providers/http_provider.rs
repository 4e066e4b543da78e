//! HTTP embedding provider.
//!
//! Blocking POST to the external embedding collaborator with an
//! explicit timeout. A timeout or transport failure surfaces as an
//! `EmbeddingError` so the degradation chain can fall through.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use jyotish_core::config::EmbeddingConfig;
use jyotish_core::errors::{EmbeddingError, JyotishResult};
use jyotish_core::traits::IEmbeddingProvider;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct HttpProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    dimensions: usize,
    timeout_secs: u64,
}

impl HttpProvider {
    pub fn new(config: &EmbeddingConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            timeout_secs: config.timeout_secs,
        }
    }

    fn request(&self, inputs: Vec<&str>) -> JyotishResult<Vec<Vec<f32>>> {
        let body = EmbedRequest {
            model: &self.model,
            input: inputs,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| self.transport_error(e))?
            .error_for_status()
            .map_err(|e| self.transport_error(e))?;

        let parsed: EmbedResponse = response.json().map_err(|e| EmbeddingError::RequestFailed {
            reason: format!("malformed embedding response: {e}"),
        })?;

        for vector in &parsed.embeddings {
            if vector.len() != self.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: vector.len(),
                }
                .into());
            }
        }
        debug!(count = parsed.embeddings.len(), "embedding batch returned");
        Ok(parsed.embeddings)
    }

    fn transport_error(&self, e: reqwest::Error) -> jyotish_core::errors::JyotishError {
        if e.is_timeout() {
            EmbeddingError::Timeout {
                seconds: self.timeout_secs,
            }
            .into()
        } else {
            EmbeddingError::RequestFailed {
                reason: e.to_string(),
            }
            .into()
        }
    }
}

impl IEmbeddingProvider for HttpProvider {
    fn embed(&self, text: &str) -> JyotishResult<Vec<f32>> {
        let mut vectors = self.request(vec![text])?;
        vectors.pop().ok_or_else(|| {
            EmbeddingError::RequestFailed {
                reason: "empty embedding response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> JyotishResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts.iter().map(String::as_str).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "http-embedding"
    }

    fn is_available(&self) -> bool {
        !self.endpoint.is_empty()
    }
}
