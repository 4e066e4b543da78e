use proptest::prelude::*;

use jyotish_core::rule::{KeyType, Weight};
use jyotish_store::keys::derive_keys;
use test_fixtures::RuleBuilder;

proptest! {
    #[test]
    fn key_derivation_is_idempotent(condition in ".{0,200}") {
        let rule = RuleBuilder::new("P1").condition(&condition).build();
        prop_assert_eq!(derive_keys(&rule), derive_keys(&rule));
    }

    #[test]
    fn classification_tags_always_derived(condition in ".{0,100}") {
        let rule = RuleBuilder::new("P1").condition(&condition).build();
        let keys = derive_keys(&rule);
        prop_assert!(keys.iter().any(|k| k.key_type == KeyType::Domain));
        prop_assert!(keys.iter().any(|k| k.key_type == KeyType::Scope));
        prop_assert!(keys.iter().any(|k| k.key_type == KeyType::ChartContext));
    }

    #[test]
    fn every_key_references_its_rule(condition in ".{0,200}") {
        let rule = RuleBuilder::new("P1").condition(&condition).build();
        for key in derive_keys(&rule) {
            prop_assert_eq!(key.rule_id.as_str(), "P1");
        }
    }

    #[test]
    fn weight_accepts_exactly_the_unit_interval(w in -2.0f64..3.0) {
        let result = Weight::new(w);
        if (0.0..=1.0).contains(&w) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
        }
    }
}
