use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding endpoint URL. Empty disables the HTTP provider and the
    /// chain starts at the hashing fallback.
    pub endpoint: String,
    /// Model name sent with each request and recorded on stored vectors.
    pub model: String,
    /// Fixed embedding dimensionality.
    pub dimensions: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Max entries in the in-memory embedding cache.
    pub cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            model: crate::constants::EMBEDDING_MODEL_TAG.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            timeout_secs: defaults::DEFAULT_EMBEDDING_TIMEOUT_SECS,
            cache_size: defaults::DEFAULT_EMBEDDING_CACHE_SIZE,
        }
    }
}
