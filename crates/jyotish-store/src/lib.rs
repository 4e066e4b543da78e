//! # jyotish-store
//!
//! Persists rules and their precomputed embeddings in SQLite, maintains
//! the exact-match symbolic key index and the vector similarity index,
//! and serves point-in-time snapshots to concurrent retrievals while
//! ingestion writes proceed on their own path.

pub mod engine;
pub mod ingest;
pub mod keys;
pub mod migrations;
pub mod queries;
pub mod snapshot;

pub use engine::StoreEngine;
pub use ingest::{ChunkOutcome, IngestReport, RuleIngestor};
pub use snapshot::IndexSnapshot;

use jyotish_core::errors::StoreError;

/// Map a rusqlite error into the store error type.
pub(crate) fn to_store_err(e: rusqlite::Error) -> StoreError {
    StoreError::Sqlite {
        reason: e.to_string(),
    }
}
