//! # jyotish-core
//!
//! Foundation crate for the Jyotish interpretation engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod chart;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod models;
pub mod rule;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use chart::{ChartFacts, Planet, PlanetPosition, Sign};
pub use config::JyotishConfig;
pub use errors::{JyotishError, JyotishResult};
pub use rule::{ChartContext, Domain, KeyType, Rule, RuleStatus, Scope, SymbolicKey, Weight};
