//! Immutable point-in-time index snapshot.
//!
//! Retrievals clone an `Arc<IndexSnapshot>` and never observe a
//! partially-updated index: writers build the next snapshot from the
//! current one and swap it in under the engine's lock.

use std::collections::HashMap;
use std::sync::Arc;

use jyotish_core::rule::{Domain, KeyType, Rule};

/// Both indexes over one consistent rule set, tagged with a generation.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    /// Monotonically increasing; bumped on every committed write.
    pub generation: u64,
    rules: Vec<Arc<Rule>>,
    by_id: HashMap<String, usize>,
    /// Exact-match index: (key type, key value) → rule positions.
    symbolic: HashMap<(KeyType, String), Vec<usize>>,
    /// Embedding per rule position, when one is stored.
    vectors: Vec<Option<Arc<Vec<f32>>>>,
}

impl IndexSnapshot {
    /// Build a snapshot from scratch (store open, or full reload).
    pub fn build(
        generation: u64,
        entries: Vec<(Rule, Vec<(KeyType, String)>, Option<Vec<f32>>)>,
    ) -> Self {
        let mut snap = Self {
            generation,
            ..Default::default()
        };
        for (rule, keys, vector) in entries {
            snap.insert_entry(rule, keys, vector);
        }
        snap
    }

    /// Copy-on-write successor with one rule inserted or replaced.
    pub fn with_rule(
        &self,
        rule: Rule,
        keys: Vec<(KeyType, String)>,
        vector: Option<Vec<f32>>,
    ) -> Self {
        let mut next = Self {
            generation: self.generation + 1,
            rules: self.rules.clone(),
            by_id: self.by_id.clone(),
            symbolic: self.symbolic.clone(),
            vectors: self.vectors.clone(),
        };

        if let Some(&idx) = next.by_id.get(&rule.id) {
            // Replacement: drop the old rule's symbolic entries first.
            for positions in next.symbolic.values_mut() {
                positions.retain(|&p| p != idx);
            }
            next.symbolic.retain(|_, v| !v.is_empty());
            next.rules[idx] = Arc::new(rule);
            next.vectors[idx] = vector.map(Arc::new);
            for key in keys {
                next.symbolic.entry(key).or_default().push(idx);
            }
            for positions in next.symbolic.values_mut() {
                positions.sort_unstable();
                positions.dedup();
            }
        } else {
            next.insert_entry(rule, keys, vector);
        }

        next
    }

    fn insert_entry(&mut self, rule: Rule, keys: Vec<(KeyType, String)>, vector: Option<Vec<f32>>) {
        let idx = self.rules.len();
        self.by_id.insert(rule.id.clone(), idx);
        self.rules.push(Arc::new(rule));
        self.vectors.push(vector.map(Arc::new));
        for key in keys {
            self.symbolic.entry(key).or_default().push(idx);
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Rule>> {
        self.by_id.get(id).map(|&i| &self.rules[i])
    }

    /// Rules matching one symbolic key. Only active rules are returned.
    pub fn lookup(&self, key_type: KeyType, key_value: &str) -> Vec<&Arc<Rule>> {
        self.symbolic
            .get(&(key_type, key_value.to_string()))
            .map(|positions| {
                positions
                    .iter()
                    .map(|&i| &self.rules[i])
                    .filter(|r| r.is_retrievable())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nearest-neighbor scan over stored embeddings. Returns
    /// (rule, cosine similarity) ordered by similarity descending,
    /// tie-broken by rule id. Similarity is clipped to [0, 1].
    pub fn semantic_search(
        &self,
        query: &[f32],
        limit: usize,
        domain: Option<Domain>,
    ) -> Vec<(Arc<Rule>, f64)> {
        let query_norm_sq: f64 = query.iter().map(|x| (*x as f64) * (*x as f64)).sum();
        if query_norm_sq == 0.0 {
            return Vec::new();
        }

        let mut scored: Vec<(Arc<Rule>, f64)> = self
            .rules
            .iter()
            .zip(self.vectors.iter())
            .filter(|(rule, _)| rule.is_retrievable())
            .filter(|(rule, _)| domain.map_or(true, |d| rule.domain == d))
            .filter_map(|(rule, vector)| {
                let v = vector.as_ref()?;
                if v.len() != query.len() {
                    return None;
                }
                let sim = cosine_similarity(query, v).clamp(0.0, 1.0);
                Some((Arc::clone(rule), sim))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        scored.truncate(limit);
        scored
    }
}

/// Cosine similarity of two equal-length vectors, in [-1, 1].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += (*x as f64) * (*y as f64);
        norm_a += (*x as f64) * (*x as f64);
        norm_b += (*y as f64) * (*y as f64);
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jyotish_core::rule::{ChartContext, RuleStatus, Scope, Weight};

    fn rule(id: &str, status: RuleStatus) -> Rule {
        Rule {
            id: id.into(),
            domain: Domain::Career,
            chart_context: ChartContext::Rasi,
            scope: Scope::Natal,
            condition: "c".into(),
            effect: "e".into(),
            modifiers: vec![],
            weight: Weight::new(0.5).unwrap(),
            source: "s".into(),
            original_text: None,
            translation: None,
            commentary: None,
            applicable_variants: vec![],
            prerequisite: None,
            cancels: vec![],
            version: 1,
            status,
        }
    }

    #[test]
    fn with_rule_leaves_previous_snapshot_untouched() {
        let base = IndexSnapshot::build(
            1,
            vec![(
                rule("A", RuleStatus::Active),
                vec![(KeyType::Domain, "career".into())],
                None,
            )],
        );
        let next = base.with_rule(
            rule("B", RuleStatus::Active),
            vec![(KeyType::Domain, "career".into())],
            None,
        );

        assert_eq!(base.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(base.lookup(KeyType::Domain, "career").len(), 1);
        assert_eq!(next.lookup(KeyType::Domain, "career").len(), 2);
        assert_eq!(next.generation, base.generation + 1);
    }

    #[test]
    fn replacement_updates_symbolic_entries() {
        let base = IndexSnapshot::build(
            1,
            vec![(
                rule("A", RuleStatus::Active),
                vec![(KeyType::PlanetHouse, "Sun_11".into())],
                None,
            )],
        );
        let next = base.with_rule(
            rule("A", RuleStatus::Active),
            vec![(KeyType::PlanetHouse, "Sun_10".into())],
            None,
        );

        assert!(next.lookup(KeyType::PlanetHouse, "Sun_11").is_empty());
        assert_eq!(next.lookup(KeyType::PlanetHouse, "Sun_10").len(), 1);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn deprecated_rules_invisible_to_lookup() {
        let snap = IndexSnapshot::build(
            1,
            vec![(
                rule("A", RuleStatus::Deprecated),
                vec![(KeyType::Domain, "career".into())],
                None,
            )],
        );
        assert!(snap.lookup(KeyType::Domain, "career").is_empty());
        assert_eq!(snap.len(), 1); // Still stored.
    }

    #[test]
    fn semantic_search_orders_by_similarity() {
        let snap = IndexSnapshot::build(
            1,
            vec![
                (
                    rule("A", RuleStatus::Active),
                    vec![],
                    Some(vec![1.0, 0.0, 0.0]),
                ),
                (
                    rule("B", RuleStatus::Active),
                    vec![],
                    Some(vec![0.0, 1.0, 0.0]),
                ),
            ],
        );
        let hits = snap.semantic_search(&[0.9, 0.1, 0.0], 10, None);
        assert_eq!(hits[0].0.id, "A");
        assert!(hits[0].1 > hits[1].1);
        assert!(hits.iter().all(|(_, s)| (0.0..=1.0).contains(s)));
    }
}
