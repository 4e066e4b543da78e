//! Error taxonomy.
//!
//! Only `Validation` and `InvalidQuery` are hard, caller-visible
//! failures. Everything else is absorbed by the orchestrator into a
//! degraded/partial result with explicit flags.

mod budget_error;
mod embedding_error;
mod generation_error;
mod retrieval_error;
mod store_error;

pub use budget_error::BudgetError;
pub use embedding_error::EmbeddingError;
pub use generation_error::GenerationError;
pub use retrieval_error::RetrievalError;
pub use store_error::StoreError;

/// Convenience alias used across the workspace.
pub type JyotishResult<T> = Result<T, JyotishError>;

/// Top-level error aggregating all subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum JyotishError {
    /// Malformed rule at ingestion. Hard failure.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// Query with neither chart facts nor free text. Hard failure.
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Budget(#[from] BudgetError),
}

impl JyotishError {
    /// Whether this error must surface to the caller rather than be
    /// absorbed into a degraded result.
    pub fn is_hard(&self) -> bool {
        matches!(
            self,
            JyotishError::Validation { .. } | JyotishError::InvalidQuery { .. }
        )
    }
}
