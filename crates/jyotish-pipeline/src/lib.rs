//! # jyotish-pipeline
//!
//! The multi-role reasoning pipeline over the retriever: router →
//! {per-domain retrieve → predict} → synthesizer → verifier, wrapped by
//! the session cache and the per-run token budget. Only validation and
//! signal-free queries fail hard; every collaborator fault is absorbed
//! into a degraded, self-auditing result.

pub mod orchestrator;
pub mod parse;
pub mod predictor;
pub mod reasoner;
pub mod router;
pub mod synthesizer;
pub mod verifier;

pub use orchestrator::Pipeline;
pub use reasoner::HttpReasoner;
