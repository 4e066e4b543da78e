//! Chunk ingestion with bounded retries.
//!
//! Each chunk walks an explicit state machine:
//! Pending → Attempting(n) → Stored | Skipped. A text-cleanup pass runs
//! between attempts; persistent failures skip the chunk and move on.
//! The run counts as complete once at least one rule is stored.

use tracing::{debug, info, warn};
use uuid::Uuid;

use jyotish_core::constants::MAX_INGEST_ATTEMPTS;
use jyotish_core::rule::Rule;

use crate::engine::StoreEngine;

/// Terminal outcome for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    Stored { rule_id: String, attempts: u8 },
    Skipped { reason: String, attempts: u8 },
}

/// Summary of one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub run_id: String,
    pub outcomes: Vec<ChunkOutcome>,
    pub stored: usize,
    pub skipped: usize,
}

impl IngestReport {
    /// A run completes when at least one rule landed, even with partial
    /// failures.
    pub fn is_complete(&self) -> bool {
        self.stored > 0
    }
}

/// Drives chunks of serialized rule documents into the store.
pub struct RuleIngestor<'a> {
    store: &'a StoreEngine,
    max_attempts: u8,
}

impl<'a> RuleIngestor<'a> {
    pub fn new(store: &'a StoreEngine) -> Self {
        Self {
            store,
            max_attempts: MAX_INGEST_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u8) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Ingest a batch of JSON rule documents, one per chunk.
    pub fn ingest_chunks(&self, chunks: &[String]) -> IngestReport {
        let run_id = Uuid::new_v4().to_string();
        info!(run = %run_id, chunks = chunks.len(), "ingestion run started");

        let outcomes: Vec<ChunkOutcome> =
            chunks.iter().map(|chunk| self.drive_chunk(chunk)).collect();

        let stored = outcomes
            .iter()
            .filter(|o| matches!(o, ChunkOutcome::Stored { .. }))
            .count();
        let skipped = outcomes.len() - stored;
        info!(run = %run_id, stored, skipped, "ingestion run finished");

        IngestReport {
            run_id,
            outcomes,
            stored,
            skipped,
        }
    }

    /// Walk one chunk to a terminal state. Every attempt either stores
    /// the rule or records the failure; attempt n+1 sees cleaned text.
    fn drive_chunk(&self, chunk: &str) -> ChunkOutcome {
        let mut text = chunk.to_string();
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match self.try_store(&text) {
                Ok(rule_id) => {
                    debug!(rule = %rule_id, attempt, "chunk stored");
                    return ChunkOutcome::Stored { rule_id, attempts: attempt };
                }
                Err(reason) => {
                    warn!(attempt, %reason, "chunk attempt failed");
                    last_error = reason;
                    text = cleanup_pass(&text);
                }
            }
        }

        ChunkOutcome::Skipped {
            reason: last_error,
            attempts: self.max_attempts,
        }
    }

    fn try_store(&self, text: &str) -> Result<String, String> {
        let rule: Rule = serde_json::from_str(text).map_err(|e| format!("parse: {e}"))?;
        let id = rule.id.clone();
        self.store
            .insert_rule(rule, None)
            .map_err(|e| format!("store: {e}"))?;
        Ok(id)
    }
}

/// Cleanup between attempts: strip control characters, trim junk before
/// the first brace and after the last, collapse whitespace runs.
fn cleanup_pass(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .collect();

    let start = stripped.find('{').unwrap_or(0);
    let end = stripped.rfind('}').map(|i| i + 1).unwrap_or(stripped.len());
    let sliced = if start < end { &stripped[start..end] } else { &stripped };

    let mut out = String::with_capacity(sliced.len());
    let mut in_space = false;
    for c in sliced.chars() {
        if c == ' ' || c == '\t' {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            in_space = false;
            out.push(c);
        }
    }
    out
}
