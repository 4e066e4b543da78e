//! Fallback chain for embedding generation.
//!
//! Tries providers in priority order; the first success wins. Every
//! fallback past the primary is recorded as a degradation event.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use jyotish_core::errors::{EmbeddingError, JyotishResult};
use jyotish_core::models::DegradationEvent;
use jyotish_core::traits::IEmbeddingProvider;

/// Ordered provider chain with degradation logging.
pub struct DegradationChain {
    chain: Vec<Arc<dyn IEmbeddingProvider>>,
    events: Mutex<Vec<DegradationEvent>>,
}

impl Default for DegradationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationChain {
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Arc<dyn IEmbeddingProvider>) {
        self.chain.push(provider);
    }

    /// Name of the first available provider.
    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.name())
            .unwrap_or("none")
    }

    /// Embed through the chain. Returns the vector and the name of the
    /// provider that produced it.
    pub fn embed(&self, text: &str) -> JyotishResult<(Vec<f32>, &str)> {
        let mut last_error = None;

        for (i, provider) in self.chain.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }
            match provider.embed(text) {
                Ok(vector) => {
                    if i > 0 {
                        self.record_fallback(provider.name());
                    }
                    return Ok((vector, provider.name()));
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider failed, trying next in chain"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable {
                provider: format!("all {} providers exhausted", self.chain.len()),
            }
            .into()
        }))
    }

    fn record_fallback(&self, fallback: &str) {
        let primary = self.chain.first().map(|p| p.name()).unwrap_or("unknown");
        let mut events = self.events.lock().expect("degradation events poisoned");
        events.push(DegradationEvent {
            component: "embeddings".to_string(),
            failure: format!("{primary} unavailable"),
            fallback_used: fallback.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Degradation events recorded so far.
    pub fn events(&self) -> Vec<DegradationEvent> {
        self.events.lock().expect("degradation events poisoned").clone()
    }
}
