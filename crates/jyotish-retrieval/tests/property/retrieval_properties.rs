//! Property tests for the hybrid retriever.

use std::sync::Arc;

use proptest::prelude::*;

use jyotish_core::config::RetrievalConfig;
use jyotish_core::models::QueryContext;
use jyotish_retrieval::RetrieverEngine;
use jyotish_store::StoreEngine;
use test_fixtures::{capricorn_sun_chart, RuleBuilder};

const CONDITIONS: &[&str] = &[
    "Sun in the 11th house",
    "The 10th lord in the 10th house",
    "Saturn in the 3rd house",
    "Mars in the 7th house",
    "Moon in the 2nd house",
];

fn engine_from(seeds: &[(usize, f64)]) -> RetrieverEngine {
    let store = StoreEngine::open_in_memory().expect("in-memory store");
    for (i, (cond, weight)) in seeds.iter().enumerate() {
        let rule = RuleBuilder::new(&format!("P{i:03}"))
            .condition(CONDITIONS[cond % CONDITIONS.len()])
            .weight(*weight)
            .build();
        store.insert_rule(rule, None).expect("insert");
    }
    RetrieverEngine::new(Arc::new(store), RetrievalConfig::default())
}

fn rule_seeds() -> impl Strategy<Value = Vec<(usize, f64)>> {
    prop::collection::vec((0usize..5, 0.0f64..=1.0), 0..12)
}

proptest! {
    #[test]
    fn retrieval_is_deterministic(
        seeds in rule_seeds(),
        limit in 1usize..10,
        min_weight in 0.0f64..1.0,
    ) {
        let engine = engine_from(&seeds);
        let query = QueryContext::for_chart(capricorn_sun_chart(), limit, min_weight);

        let first = engine.retrieve(&query).expect("first");
        let second = engine.retrieve(&query).expect("second");
        prop_assert_eq!(first.rule_ids(), second.rule_ids());
    }

    #[test]
    fn results_respect_min_weight_and_limit(
        seeds in rule_seeds(),
        limit in 1usize..10,
        min_weight in 0.0f64..1.0,
    ) {
        let engine = engine_from(&seeds);
        let query = QueryContext::for_chart(capricorn_sun_chart(), limit, min_weight);

        let outcome = engine.retrieve(&query).expect("retrieve");
        prop_assert!(outcome.results.len() <= limit);
        for ranked in &outcome.results {
            prop_assert!(ranked.rule.weight.value() >= min_weight);
        }
    }

    #[test]
    fn relevance_stays_in_unit_interval(seeds in rule_seeds()) {
        let engine = engine_from(&seeds);
        let query = QueryContext::for_chart(capricorn_sun_chart(), 20, 0.0);

        let outcome = engine.retrieve(&query).expect("retrieve");
        for ranked in &outcome.results {
            prop_assert!((0.0..=1.0).contains(&ranked.relevance));
        }
    }
}
