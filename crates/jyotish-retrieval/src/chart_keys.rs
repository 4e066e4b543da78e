//! Symbolic key derivation from chart facts.
//!
//! Pure and idempotent: identical chart facts always yield an identical
//! key set. Key formats stay in lockstep with the store-side derivation
//! from rule text (`jyotish_store::keys`).

use jyotish_core::chart::ChartFacts;
use jyotish_core::constants::HOUSE_COUNT;
use jyotish_core::rule::{Domain, KeyType, Scope};

/// Derive the exact-match keys for a query.
pub fn derive(
    chart: Option<&ChartFacts>,
    domain: Option<Domain>,
    scope: Option<Scope>,
) -> Vec<(KeyType, String)> {
    let mut keys = Vec::new();

    if let Some(chart) = chart {
        // Per-planet occupancy keys.
        for (planet, pos) in &chart.positions {
            keys.push((KeyType::PlanetHouse, format!("{}_{}", planet, pos.house)));
            keys.push((KeyType::PlanetSign, format!("{}_{}", planet, pos.sign)));
        }

        // House-lord keys: the lord of house h sits in house k.
        for house in 1..=HOUSE_COUNT {
            let lord = chart.sign_in_house(house).lord();
            if let Some(placed_in) = chart.house_of(lord) {
                keys.push((KeyType::HouseLord, format!("{house}_lord_in_{placed_in}")));
            }
        }
    }

    if let Some(domain) = domain {
        keys.push((KeyType::Domain, domain.as_str().to_string()));
    }
    if let Some(scope) = scope {
        keys.push((KeyType::Scope, scope.as_str().to_string()));
    }

    keys.sort_by(|a, b| (a.0 as u8, &a.1).cmp(&(b.0 as u8, &b.1)));
    keys.dedup();
    keys
}
