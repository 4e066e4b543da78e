use serde::{Deserialize, Serialize};

use super::defaults;

/// External reasoning collaborator client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    /// Completion endpoint URL.
    pub endpoint: String,
    /// Model name sent with each request.
    pub model: String,
    /// Per-request timeout. The call is blocking I/O; a timeout degrades
    /// only the calling stage, never the session.
    pub timeout_secs: u64,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/generate".to_string(),
            model: "default".to_string(),
            timeout_secs: defaults::DEFAULT_REASONER_TIMEOUT_SECS,
        }
    }
}
