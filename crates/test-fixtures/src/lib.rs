//! Shared builders for tests across the workspace.

use std::collections::BTreeMap;

use jyotish_core::chart::{ChartFacts, Planet, PlanetPosition, Sign};
use jyotish_core::rule::{ChartContext, Domain, Rule, RuleStatus, Scope, Weight};

/// Fluent rule builder with sensible defaults.
pub struct RuleBuilder {
    rule: Rule,
}

impl RuleBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            rule: Rule {
                id: id.to_string(),
                domain: Domain::Career,
                chart_context: ChartContext::Rasi,
                scope: Scope::Natal,
                condition: String::new(),
                effect: "favorable results".to_string(),
                modifiers: Vec::new(),
                weight: Weight::new(0.5).expect("default weight"),
                source: format!("BPHS test/{id}"),
                original_text: None,
                translation: None,
                commentary: None,
                applicable_variants: vec![ChartContext::Rasi],
                prerequisite: None,
                cancels: Vec::new(),
                version: 1,
                status: RuleStatus::Active,
            },
        }
    }

    pub fn domain(mut self, domain: Domain) -> Self {
        self.rule.domain = domain;
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.rule.scope = scope;
        self
    }

    pub fn condition(mut self, condition: &str) -> Self {
        self.rule.condition = condition.to_string();
        self
    }

    pub fn effect(mut self, effect: &str) -> Self {
        self.rule.effect = effect.to_string();
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.rule.weight = Weight::new(weight).expect("builder weight in range");
        self
    }

    pub fn cancels(mut self, ids: &[&str]) -> Self {
        self.rule.cancels = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn status(mut self, status: RuleStatus) -> Self {
        self.rule.status = status;
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.rule.version = version;
        self
    }

    pub fn build(self) -> Rule {
        self.rule
    }
}

/// The Scenario A chart: Sun in the 11th house in Capricorn, Pisces
/// rising, Saturn dasha.
pub fn capricorn_sun_chart() -> ChartFacts {
    let mut positions = BTreeMap::new();
    positions.insert(
        Planet::Sun,
        PlanetPosition {
            sign: Sign::Capricorn,
            house: 11,
            degree: None,
        },
    );
    // The 10th house from Pisces is Sagittarius; Jupiter there makes
    // the 10th lord occupy the 10th.
    positions.insert(
        Planet::Jupiter,
        PlanetPosition {
            sign: Sign::Sagittarius,
            house: 10,
            degree: None,
        },
    );
    positions.insert(
        Planet::Saturn,
        PlanetPosition {
            sign: Sign::Taurus,
            house: 3,
            degree: None,
        },
    );
    ChartFacts {
        profile_id: "profile-a".to_string(),
        chart_version: 1,
        positions,
        ascendant: Sign::Pisces,
        dasha_ruler: Planet::Saturn,
        divisional: BTreeMap::new(),
    }
}
