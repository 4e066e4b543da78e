/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("query has neither chart facts nor free text")]
    NoSignal,

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },
}
