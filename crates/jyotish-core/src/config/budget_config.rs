use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-run token budget: a fixed ceiling split into named stage
/// sub-budgets. Retrieval has no entry — exact/vector matching consumes
/// no generation tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    pub ceiling: usize,
    pub router: usize,
    pub prediction: usize,
    pub synthesis: usize,
    pub verification: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            ceiling: defaults::DEFAULT_BUDGET_CEILING,
            router: defaults::DEFAULT_ROUTER_BUDGET,
            prediction: defaults::DEFAULT_PREDICTION_BUDGET,
            synthesis: defaults::DEFAULT_SYNTHESIS_BUDGET,
            verification: defaults::DEFAULT_VERIFICATION_BUDGET,
        }
    }
}
