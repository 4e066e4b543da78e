//! Per-run token budget.
//!
//! A fixed ceiling split into named stage sub-budgets. A stage either
//! fits entirely under the remaining ceiling or is skipped; partial
//! execution never happens. Retrieval has no stage here: exact and
//! vector matching consume no generation tokens.

use std::collections::BTreeMap;
use std::sync::Mutex;

use tracing::warn;

use jyotish_core::config::BudgetConfig;
use jyotish_core::errors::BudgetError;
use jyotish_core::models::{Stage, UsageReport};

/// Tracks token spend for one pipeline run. Thread-safe: per-domain
/// prediction tasks record concurrently.
pub struct SessionBudget {
    config: BudgetConfig,
    used: Mutex<BTreeMap<Stage, usize>>,
}

impl SessionBudget {
    pub fn new(config: BudgetConfig) -> Self {
        Self {
            config,
            used: Mutex::new(BTreeMap::new()),
        }
    }

    /// The configured sub-budget for a stage.
    pub fn allowance(&self, stage: Stage) -> usize {
        match stage {
            Stage::Router => self.config.router,
            Stage::Prediction => self.config.prediction,
            Stage::Synthesis => self.config.synthesis,
            Stage::Verification => self.config.verification,
        }
    }

    /// Tokens still available under the ceiling.
    pub fn remaining(&self) -> usize {
        let used = self.used.lock().expect("budget lock poisoned");
        self.config.ceiling.saturating_sub(used.values().sum())
    }

    /// Admit a stage: its full sub-budget must fit under the remaining
    /// ceiling, otherwise the stage is skipped entirely. Returns the
    /// stage allowance to use as the request's max_tokens.
    pub fn try_begin(&self, stage: Stage) -> Result<usize, BudgetError> {
        let allowance = self.allowance(stage);
        let remaining = self.remaining();
        if allowance > remaining {
            return Err(BudgetError::Exhausted {
                stage: stage.as_str().to_string(),
                needed: allowance,
                remaining,
            });
        }
        Ok(allowance)
    }

    /// Record actual spend for a stage. Spend beyond the remaining
    /// ceiling is clamped so the conservation property holds even
    /// against a collaborator that overruns its max_tokens.
    pub fn record(&self, stage: Stage, tokens: usize) {
        let mut used = self.used.lock().expect("budget lock poisoned");
        let total: usize = used.values().sum();
        let headroom = self.config.ceiling.saturating_sub(total);
        let charged = tokens.min(headroom);
        if charged < tokens {
            warn!(
                stage = stage.as_str(),
                tokens, charged, "token spend clamped at the ceiling"
            );
        }
        *used.entry(stage).or_default() += charged;
    }

    /// Accounting snapshot for the result.
    pub fn report(&self) -> UsageReport {
        let used = self.used.lock().expect("budget lock poisoned");
        UsageReport {
            per_stage: used.clone(),
            total: used.values().sum(),
            ceiling: self.config.ceiling,
        }
    }
}
