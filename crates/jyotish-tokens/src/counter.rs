//! Accurate token counting with content-hash caching.

use moka::sync::Cache;
use tiktoken_rs::{cl100k_base, CoreBPE};

/// Counts tokens with the cl100k vocabulary. Prompt builders use this
/// for budget estimates before any request leaves the process.
pub struct TokenCounter {
    bpe: CoreBPE,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    pub fn new() -> Self {
        // The vocabulary is embedded in the binary; loading it cannot
        // fail outside of memory exhaustion.
        let bpe = cl100k_base().expect("embedded cl100k vocabulary");
        Self {
            bpe,
            cache: Cache::new(10_000),
        }
    }

    /// Exact token count.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    /// Token count through the blake3-keyed cache.
    pub fn count_cached(&self, text: &str) -> usize {
        let key = blake3::hash(text.as_bytes()).to_hex().to_string();
        if let Some(count) = self.cache.get(&key) {
            return count;
        }
        let count = self.count(text);
        self.cache.insert(key, count);
        count
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new()
    }
}
