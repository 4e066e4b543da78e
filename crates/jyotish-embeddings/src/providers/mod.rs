//! Embedding provider implementations.

mod hashing_fallback;
mod http_provider;

pub use hashing_fallback::HashingFallback;
pub use http_provider::HttpProvider;

use std::sync::Arc;

use jyotish_core::config::EmbeddingConfig;
use jyotish_core::traits::IEmbeddingProvider;

/// Build the configured primary provider. An empty endpoint means no
/// HTTP provider; the chain then starts at the hashing fallback.
pub fn create_primary(config: &EmbeddingConfig) -> Option<Arc<dyn IEmbeddingProvider>> {
    if config.endpoint.is_empty() {
        return None;
    }
    Some(Arc::new(HttpProvider::new(config)))
}
