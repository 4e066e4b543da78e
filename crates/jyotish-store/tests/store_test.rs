//! Integration tests for the rule store: validation at ingestion,
//! snapshot isolation, domain listing, and the ingestion state machine.

use jyotish_core::errors::{JyotishError, StoreError};
use jyotish_core::rule::{Domain, KeyType, RuleStatus, Weight};
use jyotish_core::traits::IRuleStore;
use jyotish_store::{ChunkOutcome, RuleIngestor, StoreEngine};
use test_fixtures::RuleBuilder;

fn store() -> StoreEngine {
    jyotish_core::logging::init();
    StoreEngine::open_in_memory().expect("in-memory store")
}

#[test]
fn weight_type_rejects_out_of_range_at_the_boundary() {
    // The ingestion boundary cannot even construct an invalid rule.
    assert!(matches!(
        Weight::new(1.5),
        Err(StoreError::InvalidWeight { .. })
    ));
}

#[test]
fn empty_rule_id_is_rejected() {
    let store = store();
    let rule = RuleBuilder::new("  ").condition("Sun in 11th house").build();
    let err = store.insert_rule(rule, None).unwrap_err();
    assert!(matches!(err, JyotishError::Store(StoreError::EmptyRuleId)));
}

#[test]
fn insert_derives_symbolic_keys_into_the_snapshot() {
    let store = store();
    store
        .insert_rule(
            RuleBuilder::new("R1")
                .condition("10th lord in 10th house gives a strong career")
                .weight(0.9)
                .build(),
            None,
        )
        .unwrap();

    let snap = store.snapshot();
    let hits = snap.lookup(KeyType::HouseLord, "10_lord_in_10");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "R1");
}

#[test]
fn snapshot_is_point_in_time() {
    let store = store();
    store
        .insert_rule(RuleBuilder::new("R1").condition("Sun in 11th house").build(), None)
        .unwrap();

    let before = store.snapshot();
    store
        .insert_rule(RuleBuilder::new("R2").condition("Moon in 4th house").build(), None)
        .unwrap();
    let after = store.snapshot();

    // The old snapshot never sees the new write.
    assert_eq!(before.len(), 1);
    assert_eq!(after.len(), 2);
    assert!(after.generation > before.generation);
}

#[test]
fn reinsert_with_lower_version_fails() {
    let store = store();
    store
        .insert_rule(RuleBuilder::new("R1").version(3).condition("Sun in 1st house").build(), None)
        .unwrap();
    let err = store
        .insert_rule(RuleBuilder::new("R1").version(2).condition("Sun in 1st house").build(), None)
        .unwrap_err();
    assert!(matches!(
        err,
        JyotishError::Store(StoreError::StaleVersion { .. })
    ));
}

#[test]
fn list_by_domain_orders_by_weight_then_id() {
    let store = store();
    for (id, weight) in [("B", 0.7), ("A", 0.7), ("C", 0.9), ("D", 0.2)] {
        store
            .insert_rule(
                RuleBuilder::new(id)
                    .domain(Domain::Career)
                    .condition("Sun in 10th house")
                    .weight(weight)
                    .build(),
                None,
            )
            .unwrap();
    }
    store
        .insert_rule(
            RuleBuilder::new("E")
                .domain(Domain::Health)
                .condition("Mars in 6th house")
                .weight(0.95)
                .build(),
            None,
        )
        .unwrap();

    let rules = store.list_by_domain(Domain::Career, 10, 0.5).unwrap();
    let ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
    // 0.9 first, then the 0.7 pair tie-broken by id; D filtered by min_weight.
    assert_eq!(ids, vec!["C", "A", "B"]);
}

#[test]
fn file_backed_store_reopens_with_its_rules() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rules.db");
    {
        let store = StoreEngine::open(&path).expect("open");
        store
            .insert_rule(
                RuleBuilder::new("R1")
                    .condition("Sun in 11th house")
                    .weight(0.8)
                    .build(),
                None,
            )
            .unwrap();
    }

    // Reopen runs the migrations again and rebuilds the snapshot from
    // the rows on disk.
    let reopened = StoreEngine::open(&path).expect("reopen");
    assert_eq!(reopened.rule_count().unwrap(), 1);

    let snap = reopened.snapshot();
    let hits = snap.lookup(KeyType::PlanetHouse, "Sun_11");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "R1");
}

#[test]
fn deprecate_hides_from_retrieval_but_keeps_the_row() {
    let store = store();
    store
        .insert_rule(RuleBuilder::new("R1").condition("Sun in 11th house").build(), None)
        .unwrap();
    store.deprecate("R1").unwrap();

    let snap = store.snapshot();
    assert!(snap.lookup(KeyType::PlanetHouse, "Sun_11").is_empty());
    // Provenance survives: the rule is still fetchable and counted.
    assert_eq!(snap.get("R1").unwrap().status, RuleStatus::Deprecated);
    assert_eq!(store.rule_count().unwrap(), 1);
}

#[test]
fn ingest_reaches_terminal_state_for_every_chunk() {
    let store = store();
    let good = serde_json::to_string(
        &RuleBuilder::new("R1").condition("Sun in 11th house").build(),
    )
    .unwrap();
    // Recoverable: junk around valid JSON, fixed by the cleanup pass.
    let recoverable = format!("log noise {good2}", good2 = serde_json::to_string(
        &RuleBuilder::new("R2").condition("Moon in 4th house").build(),
    )
    .unwrap());
    let hopeless = "not json at all".to_string();

    let report = RuleIngestor::new(&store).ingest_chunks(&[good, recoverable, hopeless]);

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.stored, 2);
    assert_eq!(report.skipped, 1);
    assert!(report.is_complete());
    assert!(matches!(
        report.outcomes[1],
        ChunkOutcome::Stored { attempts, .. } if attempts > 1
    ));
    assert!(matches!(report.outcomes[2], ChunkOutcome::Skipped { .. }));
}

#[test]
fn ingest_with_zero_stored_is_incomplete() {
    let store = store();
    let report = RuleIngestor::new(&store).ingest_chunks(&["garbage".to_string()]);
    assert!(!report.is_complete());
    assert_eq!(store.rule_count().unwrap(), 0);
}
