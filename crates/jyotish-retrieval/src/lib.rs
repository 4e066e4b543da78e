//! # jyotish-retrieval
//!
//! Hybrid rule retrieval over a store snapshot.
//!
//! Pass 1: exact-match union over symbolic keys derived from chart facts.
//! Pass 2: vector similarity, run only when free text is present or the
//! symbolic pass came up thin; failure degrades to symbolic-only.
//! Then: weighted linear scoring, canceler conflict resolution, and a
//! fully deterministic final ordering.

pub mod chart_keys;
pub mod conflict;
pub mod engine;
pub mod scoring;

pub use engine::RetrieverEngine;
