//! # jyotish-embeddings
//!
//! Embedding generation for rule text and retrieval queries.
//! Chain: HTTP provider → hashing fallback. Every fallback is recorded
//! as a degradation event; a blake3-keyed cache sits in front.

pub mod cache;
pub mod degradation;
pub mod engine;
pub mod providers;

pub use degradation::DegradationChain;
pub use engine::EmbeddingEngine;
pub use providers::{HashingFallback, HttpProvider};
