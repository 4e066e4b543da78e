/// Jyotish system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of houses in a chart.
pub const HOUSE_COUNT: u8 = 12;

/// Maximum rules returned by a single retrieval, regardless of limit.
pub const MAX_RETRIEVAL_LIMIT: usize = 100;

/// Maximum ingestion attempts per chunk before it is skipped.
pub const MAX_INGEST_ATTEMPTS: u8 = 3;

/// Embedding model tag recorded alongside stored vectors.
pub const EMBEDDING_MODEL_TAG: &str = "text-embed-v2";
