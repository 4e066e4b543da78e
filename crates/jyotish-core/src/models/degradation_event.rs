use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded fallback: which component failed and what stood in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}
