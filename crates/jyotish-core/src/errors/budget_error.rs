/// Token budget errors. Never caller-visible: the orchestrator
/// translates exhaustion into skipped optional stages.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    #[error("budget exhausted for {stage}: needed {needed}, remaining {remaining}")]
    Exhausted {
        stage: String,
        needed: usize,
        remaining: usize,
    },
}
