//! EmbeddingEngine — chain + cache behind the provider trait.

use std::sync::Arc;

use tracing::{debug, info};

use jyotish_core::config::EmbeddingConfig;
use jyotish_core::errors::JyotishResult;
use jyotish_core::traits::IEmbeddingProvider;

use crate::cache::EmbeddingCache;
use crate::degradation::DegradationChain;
use crate::providers::{self, HashingFallback};

/// The main embedding engine: configured provider chain with a
/// content-hash cache in front. Implements `IEmbeddingProvider` so it
/// can stand anywhere a provider is expected.
pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: EmbeddingCache,
    model: String,
    dimensions: usize,
}

impl EmbeddingEngine {
    pub fn new(config: &EmbeddingConfig) -> Self {
        let mut chain = DegradationChain::new();
        if let Some(primary) = providers::create_primary(config) {
            chain.push(primary);
        }
        // The hashing fallback always terminates the chain.
        chain.push(Arc::new(HashingFallback::new(config.dimensions)));

        info!(
            provider = chain.active_provider_name(),
            dims = config.dimensions,
            "embedding engine initialized"
        );

        Self {
            chain,
            cache: EmbeddingCache::new(config.cache_size),
            model: config.model.clone(),
            dimensions: config.dimensions,
        }
    }

    fn embed_cached(&self, text: &str) -> JyotishResult<Vec<f32>> {
        if let Some(vector) = self.cache.lookup(&self.model, text) {
            debug!(model = %self.model, "embedding cache hit");
            return Ok(vector);
        }
        let (vector, _provider) = self.chain.embed(text)?;
        self.cache.store(&self.model, text, vector.clone());
        Ok(vector)
    }

    /// Degradation events recorded by the chain so far.
    pub fn degradation_events(&self) -> Vec<jyotish_core::models::DegradationEvent> {
        self.chain.events()
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> JyotishResult<Vec<f32>> {
        self.embed_cached(text)
    }

    fn embed_batch(&self, texts: &[String]) -> JyotishResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_cached(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "embedding-engine"
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_without_endpoint_uses_fallback() {
        let engine = EmbeddingEngine::new(&EmbeddingConfig::default());
        let v = engine.embed("Jupiter in 5th house").unwrap();
        assert_eq!(v.len(), EmbeddingConfig::default().dimensions);
        assert!(engine.degradation_events().is_empty());
    }

    #[test]
    fn repeated_embed_hits_cache() {
        let engine = EmbeddingEngine::new(&EmbeddingConfig::default());
        let a = engine.embed("Venus in 7th house").unwrap();
        let b = engine.embed("Venus in 7th house").unwrap();
        assert_eq!(a, b);
    }
}
