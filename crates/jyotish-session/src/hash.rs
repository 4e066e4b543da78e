//! Canonical request hashing.

use jyotish_core::models::InterpretRequest;

/// Digest the parameters that determine a result's content.
///
/// Domains are sorted and deduplicated first, so `[Career, Wealth]` and
/// `[Wealth, Career, Wealth]` hash identically. `query_text` and
/// `force_regenerate` are excluded: the former only flavors the
/// narrative, the latter is a cache directive.
pub fn canonical_hash(request: &InterpretRequest) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(request.profile_id.as_bytes());
    hasher.update(b"\x1f");
    hasher.update(&request.chart_version.to_le_bytes());

    let mut domains: Vec<&str> = request
        .domains
        .iter()
        .flatten()
        .map(|d| d.as_str())
        .collect();
    domains.sort_unstable();
    domains.dedup();
    for domain in domains {
        hasher.update(b"\x1f");
        hasher.update(domain.as_bytes());
    }

    hasher.update(b"\x1f");
    hasher.update(&[u8::from(request.include_predictions)]);
    hasher.update(&[u8::from(request.include_transits)]);
    hasher.update(&request.window_months.to_le_bytes());

    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jyotish_core::rule::Domain;

    fn request() -> InterpretRequest {
        InterpretRequest {
            profile_id: "profile-a".to_string(),
            chart_version: 1,
            query_text: None,
            domains: Some(vec![Domain::Career, Domain::Wealth]),
            include_predictions: true,
            include_transits: false,
            window_months: 12,
            force_regenerate: false,
        }
    }

    #[test]
    fn domain_order_and_duplicates_do_not_matter() {
        let a = request();
        let mut b = request();
        b.domains = Some(vec![Domain::Wealth, Domain::Career, Domain::Wealth]);
        assert_eq!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn query_text_is_excluded() {
        let a = request();
        let mut b = request();
        b.query_text = Some("what about my career prospects".to_string());
        assert_eq!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn chart_version_changes_the_hash() {
        let a = request();
        let mut b = request();
        b.chart_version = 2;
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }

    #[test]
    fn window_and_flags_change_the_hash() {
        let a = request();
        let mut b = request();
        b.window_months = 24;
        assert_ne!(canonical_hash(&a), canonical_hash(&b));

        let mut c = request();
        c.include_predictions = false;
        assert_ne!(canonical_hash(&a), canonical_hash(&c));
    }
}
