//! Content-addressed vector cache.
//!
//! Entries are keyed by a blake3 digest of the model tag and the
//! text, so vectors produced by different models never collide even
//! when the same text passes through both.

use std::time::Duration;

use moka::sync::Cache;

const IDLE_EVICTION_SECS: u64 = 3600;

pub struct EmbeddingCache {
    vectors: Cache<[u8; 32], Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new(max_entries: u64) -> Self {
        Self {
            vectors: Cache::builder()
                .max_capacity(max_entries)
                .time_to_idle(Duration::from_secs(IDLE_EVICTION_SECS))
                .build(),
        }
    }

    fn digest(model: &str, text: &str) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(model.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(text.as_bytes());
        *hasher.finalize().as_bytes()
    }

    pub fn lookup(&self, model: &str, text: &str) -> Option<Vec<f32>> {
        self.vectors.get(&Self::digest(model, text))
    }

    pub fn store(&self, model: &str, text: &str, vector: Vec<f32>) {
        self.vectors.insert(Self::digest(model, text), vector);
    }

    pub fn entry_count(&self) -> u64 {
        self.vectors.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_lookup() {
        let cache = EmbeddingCache::new(16);
        cache.store("model-a", "Sun in 11th house", vec![0.1, 0.2]);
        assert_eq!(
            cache.lookup("model-a", "Sun in 11th house"),
            Some(vec![0.1, 0.2])
        );
    }

    #[test]
    fn models_do_not_share_entries() {
        let cache = EmbeddingCache::new(16);
        cache.store("model-a", "Sun in 11th house", vec![0.1]);
        assert!(cache.lookup("model-b", "Sun in 11th house").is_none());
    }
}
