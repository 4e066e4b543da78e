use proptest::prelude::*;

use jyotish_core::config::BudgetConfig;
use jyotish_core::models::Stage;
use jyotish_tokens::{SessionBudget, TokenCounter};

proptest! {
    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let counter = TokenCounter::default();
        prop_assert_eq!(counter.count(&s), counter.count_cached(&s));
    }

    #[test]
    fn count_is_bounded_by_input_size(s in ".{1,100}") {
        let counter = TokenCounter::default();
        // One token per byte is a safe upper bound for cl100k.
        prop_assert!(counter.count(&s) <= s.len() + 1);
    }

    #[test]
    fn budget_total_never_exceeds_ceiling(
        spends in proptest::collection::vec((0usize..4, 0usize..4000), 0..12)
    ) {
        let budget = SessionBudget::new(BudgetConfig::default());
        let stages = [Stage::Router, Stage::Prediction, Stage::Synthesis, Stage::Verification];
        for (stage_idx, tokens) in spends {
            budget.record(stages[stage_idx], tokens);
        }
        let report = budget.report();
        prop_assert!(report.total <= report.ceiling);
        prop_assert_eq!(report.total, report.per_stage.values().sum::<usize>());
    }

    #[test]
    fn admitted_stage_always_fits(
        pre_spend in 0usize..10_000
    ) {
        let budget = SessionBudget::new(BudgetConfig::default());
        budget.record(Stage::Synthesis, pre_spend);
        match budget.try_begin(Stage::Prediction) {
            Ok(allowance) => prop_assert!(allowance <= budget.remaining()),
            Err(_) => prop_assert!(budget.remaining() < BudgetConfig::default().prediction),
        }
    }
}
