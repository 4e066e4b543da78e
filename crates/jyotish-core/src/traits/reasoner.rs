use crate::errors::JyotishResult;

/// One bounded completion request. `max_tokens` caps the response; the
/// stage name travels along for accounting and error messages.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub stage: &'static str,
    pub system: String,
    pub prompt: String,
    pub max_tokens: usize,
}

/// A completion plus the tokens it cost (prompt + response).
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub tokens_used: usize,
}

/// The external reasoning collaborator: a slow, fallible, blocking call
/// with an explicit timeout owned by the implementation.
pub trait IReasoner: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> JyotishResult<Completion>;
}
