use std::sync::Arc;

use crate::errors::JyotishResult;
use crate::rule::{Domain, Rule};

/// Read surface of the rule store, as the retriever sees it.
///
/// The write surface (insert, deprecate, ingestion) is concrete on the
/// store engine; retrieval only ever needs point-in-time reads.
pub trait IRuleStore: Send + Sync {
    /// Look up one rule by id.
    fn get_rule(&self, id: &str) -> JyotishResult<Option<Arc<Rule>>>;

    /// Active rules for a domain, weight descending, id ascending.
    fn list_by_domain(
        &self,
        domain: Domain,
        limit: usize,
        min_weight: f64,
    ) -> JyotishResult<Vec<Arc<Rule>>>;

    /// Total stored rules (all statuses).
    fn rule_count(&self) -> JyotishResult<usize>;
}
