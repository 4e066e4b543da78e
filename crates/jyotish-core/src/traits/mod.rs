//! Seams between subsystems. Implementations live in their own crates;
//! tests substitute scripted fakes.

mod embedding;
mod reasoner;
mod rule_store;

pub use embedding::IEmbeddingProvider;
pub use reasoner::{Completion, CompletionRequest, IReasoner};
pub use rule_store::IRuleStore;
