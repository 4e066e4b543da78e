//! # jyotish-session
//!
//! Result caching for interpretation runs. Requests are keyed by a
//! canonical hash of their normalized parameters; free query text is
//! deliberately excluded so rephrasing a question never forces a fresh
//! run. Entries expire on a TTL and are evicted lazily on access.

pub mod cache;
pub mod hash;

pub use cache::{CachedResult, SessionCache};
pub use hash::canonical_hash;
