//! Typed inputs and outputs for every pipeline stage.

mod degradation_event;
mod pipeline_result;
mod prediction;
mod query_context;
mod retrieval_result;
mod verification_report;

pub use degradation_event::DegradationEvent;
pub use pipeline_result::{
    CacheMeta, DomainAnalysis, InterpretRequest, PipelineResult, RuleCitation, Stage, UsageReport,
};
pub use prediction::{ConfidenceLevel, Intensity, KeyPeriod, Prediction};
pub use query_context::QueryContext;
pub use retrieval_result::{RankedRule, RetrievalOutcome};
pub use verification_report::{CitationMetrics, ConfidenceBand, VerificationReport};
