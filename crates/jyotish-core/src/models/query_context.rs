use serde::{Deserialize, Serialize};

use crate::chart::ChartFacts;
use crate::rule::{Domain, Scope};

/// What the retriever consumes: chart facts and/or free text, plus
/// filters. At least one of `chart` or `query_text` must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryContext {
    pub chart: Option<ChartFacts>,
    pub query_text: Option<String>,
    /// Restrict to one domain when set.
    pub domain: Option<Domain>,
    /// Restrict to one scope when set.
    pub scope: Option<Scope>,
    pub limit: usize,
    pub min_weight: f64,
}

impl QueryContext {
    /// A chart-only query with default filters.
    pub fn for_chart(chart: ChartFacts, limit: usize, min_weight: f64) -> Self {
        Self {
            chart: Some(chart),
            query_text: None,
            domain: None,
            scope: None,
            limit,
            min_weight,
        }
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn with_query_text(mut self, text: impl Into<String>) -> Self {
        self.query_text = Some(text.into());
        self
    }

    /// Whether the query carries any retrieval signal at all.
    pub fn has_signal(&self) -> bool {
        self.chart.is_some() || self.query_text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}
