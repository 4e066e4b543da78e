//! Cancellation (bhanga) resolution over a scored candidate set.
//!
//! A rule may list other rules that cancel it. Cancellation fires only
//! when the canceler is itself present in the candidate set: a canceler
//! the chart never matched has no force. Resolution works against the
//! pre-resolution set, so a canceler that is itself cancelled still
//! suppresses its targets for this query.

use std::collections::HashMap;

use jyotish_core::models::RankedRule;
use tracing::debug;

/// Drop every candidate that a stronger co-present canceler suppresses.
///
/// A canceler suppresses its target when its relevance is strictly
/// greater. At equal relevance the narrower scope wins (transit is
/// narrower than dasha, dasha narrower than natal); with identical
/// scope the lexicographically smaller id survives, so the outcome
/// never depends on input order.
pub fn resolve(candidates: Vec<RankedRule>) -> Vec<RankedRule> {
    let by_id: HashMap<&str, &RankedRule> = candidates
        .iter()
        .map(|r| (r.rule.id.as_str(), r))
        .collect();

    let mut dropped: Vec<bool> = vec![false; candidates.len()];
    for (i, target) in candidates.iter().enumerate() {
        for canceler_id in &target.rule.cancels {
            let Some(canceler) = by_id.get(canceler_id.as_str()) else {
                continue;
            };
            if suppresses(canceler, target) {
                debug!(
                    rule = %target.rule.id,
                    canceler = %canceler.rule.id,
                    "rule cancelled"
                );
                dropped[i] = true;
                break;
            }
        }
    }

    candidates
        .into_iter()
        .zip(dropped)
        .filter_map(|(r, gone)| (!gone).then_some(r))
        .collect()
}

fn suppresses(canceler: &RankedRule, target: &RankedRule) -> bool {
    if canceler.relevance > target.relevance {
        return true;
    }
    if canceler.relevance < target.relevance {
        return false;
    }
    let (cn, tn) = (
        canceler.rule.scope.narrowness(),
        target.rule.scope.narrowness(),
    );
    if cn != tn {
        return cn > tn;
    }
    canceler.rule.id < target.rule.id
}
