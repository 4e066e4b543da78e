//! # jyotish-tokens
//!
//! Token counting (cl100k BPE with a content-hash cache) and the
//! per-run budget manager that bounds what the generation stages may
//! spend.

pub mod budget;
pub mod counter;

pub use budget::SessionBudget;
pub use counter::TokenCounter;
