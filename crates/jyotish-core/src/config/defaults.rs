//! Default policy values. Referenced only by the config structs.

// Retrieval
pub const DEFAULT_SCORE_SYMBOLIC: f64 = 0.4;
pub const DEFAULT_SCORE_SEMANTIC: f64 = 0.4;
pub const DEFAULT_SCORE_WEIGHT: f64 = 0.2;
pub const DEFAULT_RESULT_LIMIT: usize = 20;
pub const DEFAULT_MIN_WEIGHT: f64 = 0.0;
pub const DEFAULT_MIN_SYMBOLIC_CANDIDATES: usize = 3;

// Prediction confidence bands
pub const DEFAULT_VERY_HIGH_THRESHOLD: u8 = 90;
pub const DEFAULT_HIGH_THRESHOLD: u8 = 75;
pub const DEFAULT_MEDIUM_THRESHOLD: u8 = 50;
pub const DEFAULT_LOW_THRESHOLD: u8 = 25;
pub const DEFAULT_WINDOW_MONTHS: u32 = 12;
pub const DEFAULT_PARSE_RETRIES: u8 = 1;

// Token budget (token-equivalents per run)
pub const DEFAULT_BUDGET_CEILING: usize = 8000;
pub const DEFAULT_ROUTER_BUDGET: usize = 400;
pub const DEFAULT_PREDICTION_BUDGET: usize = 2000;
pub const DEFAULT_SYNTHESIS_BUDGET: usize = 4000;
pub const DEFAULT_VERIFICATION_BUDGET: usize = 1200;

// Session cache
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

// External collaborator
pub const DEFAULT_REASONER_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_EMBEDDING_CACHE_SIZE: u64 = 10_000;

// Verifier
pub const DEFAULT_QUALITY_HIGH: f64 = 7.0;
pub const DEFAULT_ACCURACY_HIGH: f64 = 0.8;
pub const DEFAULT_QUALITY_MEDIUM: f64 = 4.0;
pub const DEFAULT_ACCURACY_MEDIUM: f64 = 0.5;
