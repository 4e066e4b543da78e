/// Errors from the external reasoning collaborator and response parsing.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("reasoner request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("reasoner request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("unparsable reasoner output for {stage}: {reason}")]
    ParseFailed { stage: String, reason: String },
}
