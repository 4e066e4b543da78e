//! Symbolic key derivation from rule condition text.
//!
//! A fixed set of patterns turns classical condition phrasing into the
//! exact-match keys the retriever derives from chart facts. Key formats
//! must stay in lockstep with `jyotish_retrieval::chart_keys`:
//! planet-house "Sun_11", house-lord "10_lord_in_10", planet-sign
//! "Sun_Capricorn", yoga "gajakesari_yoga".

use std::sync::OnceLock;

use regex::Regex;

use jyotish_core::rule::{KeyType, Rule, SymbolicKey};

fn planet_house_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(Sun|Moon|Mars|Mercury|Jupiter|Venus|Saturn|Rahu|Ketu)\s+(?:in|occupies|placed\s+in)\s+(?:the\s+)?(\d{1,2})(?:st|nd|rd|th)?\s+house",
        )
        .expect("planet-house pattern")
    })
}

fn house_lord_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+lord\s+(?:in|occupies|placed\s+in)\s+(?:the\s+)?(\d{1,2})(?:st|nd|rd|th)?(?:\s+house)?",
        )
        .expect("house-lord pattern")
    })
}

fn planet_sign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(Sun|Moon|Mars|Mercury|Jupiter|Venus|Saturn|Rahu|Ketu)\s+(?:in|occupies)\s+(Aries|Taurus|Gemini|Cancer|Leo|Virgo|Libra|Scorpio|Sagittarius|Capricorn|Aquarius|Pisces)",
        )
        .expect("planet-sign pattern")
    })
}

fn yoga_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b([a-z]+(?:\s+[a-z]+)?)\s+yoga\b").expect("yoga pattern")
    })
}

/// Title-case a planet or sign capture so key values are canonical
/// regardless of how the source text spelled them.
fn canonical(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Derive every symbolic key for a rule: pattern keys from the condition
/// text plus classification tag keys. Deterministic and duplicate-free.
pub fn derive_keys(rule: &Rule) -> Vec<SymbolicKey> {
    let mut keys = Vec::new();
    let text = &rule.condition;

    for cap in planet_house_re().captures_iter(text) {
        let planet = canonical(&cap[1]);
        let house = cap[2].parse::<u8>().unwrap_or(0);
        if (1..=12).contains(&house) {
            keys.push(SymbolicKey::new(
                KeyType::PlanetHouse,
                format!("{planet}_{house}"),
                &rule.id,
            ));
        }
    }

    for cap in house_lord_re().captures_iter(text) {
        let lord_of = cap[1].parse::<u8>().unwrap_or(0);
        let placed_in = cap[2].parse::<u8>().unwrap_or(0);
        if (1..=12).contains(&lord_of) && (1..=12).contains(&placed_in) {
            keys.push(SymbolicKey::new(
                KeyType::HouseLord,
                format!("{lord_of}_lord_in_{placed_in}"),
                &rule.id,
            ));
        }
    }

    for cap in planet_sign_re().captures_iter(text) {
        let planet = canonical(&cap[1]);
        let sign = canonical(&cap[2]);
        keys.push(SymbolicKey::new(
            KeyType::PlanetSign,
            format!("{planet}_{sign}"),
            &rule.id,
        ));
    }

    for cap in yoga_re().captures_iter(text) {
        let name = cap[1].to_lowercase().replace(' ', "_");
        keys.push(SymbolicKey::new(
            KeyType::Yoga,
            format!("{name}_yoga"),
            &rule.id,
        ));
    }

    // Classification tags come from the validated enum fields, not text.
    keys.push(SymbolicKey::new(
        KeyType::Domain,
        rule.domain.as_str(),
        &rule.id,
    ));
    keys.push(SymbolicKey::new(
        KeyType::Scope,
        rule.scope.as_str(),
        &rule.id,
    ));
    keys.push(SymbolicKey::new(
        KeyType::ChartContext,
        rule.chart_context.as_str(),
        &rule.id,
    ));

    keys.sort_by(|a, b| (a.key_type as u8, &a.key_value).cmp(&(b.key_type as u8, &b.key_value)));
    keys.dedup();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use jyotish_core::rule::{ChartContext, Domain, RuleStatus, Scope, Weight};

    fn rule_with_condition(condition: &str) -> Rule {
        Rule {
            id: "R1".into(),
            domain: Domain::Career,
            chart_context: ChartContext::Rasi,
            scope: Scope::Natal,
            condition: condition.into(),
            effect: "gains".into(),
            modifiers: vec![],
            weight: Weight::new(0.8).unwrap(),
            source: "BPHS 1.1".into(),
            original_text: None,
            translation: None,
            commentary: None,
            applicable_variants: vec![],
            prerequisite: None,
            cancels: vec![],
            version: 1,
            status: RuleStatus::Active,
        }
    }

    fn values_of(keys: &[SymbolicKey], kt: KeyType) -> Vec<&str> {
        keys.iter()
            .filter(|k| k.key_type == kt)
            .map(|k| k.key_value.as_str())
            .collect()
    }

    #[test]
    fn planet_in_house_key() {
        let keys = derive_keys(&rule_with_condition("Sun in 11th house brings gains"));
        assert_eq!(values_of(&keys, KeyType::PlanetHouse), vec!["Sun_11"]);
    }

    #[test]
    fn lord_in_house_key() {
        let keys = derive_keys(&rule_with_condition(
            "10th lord in 10th house gives a strong career",
        ));
        assert_eq!(values_of(&keys, KeyType::HouseLord), vec!["10_lord_in_10"]);
    }

    #[test]
    fn planet_in_sign_key() {
        let keys = derive_keys(&rule_with_condition("Saturn in Capricorn is dignified"));
        assert_eq!(
            values_of(&keys, KeyType::PlanetSign),
            vec!["Saturn_Capricorn"]
        );
    }

    #[test]
    fn named_yoga_key() {
        let keys = derive_keys(&rule_with_condition(
            "Gajakesari yoga forms when Jupiter is in a kendra from the Moon",
        ));
        assert!(values_of(&keys, KeyType::Yoga).contains(&"gajakesari_yoga"));
    }

    #[test]
    fn classification_tags_always_present() {
        let keys = derive_keys(&rule_with_condition("anything"));
        assert_eq!(values_of(&keys, KeyType::Domain), vec!["career"]);
        assert_eq!(values_of(&keys, KeyType::Scope), vec!["natal"]);
        assert_eq!(values_of(&keys, KeyType::ChartContext), vec!["d1"]);
    }

    #[test]
    fn derivation_is_idempotent() {
        let rule = rule_with_condition("Sun in 11th house, 10th lord in 10th");
        assert_eq!(derive_keys(&rule), derive_keys(&rule));
    }

    #[test]
    fn out_of_range_house_ignored() {
        let keys = derive_keys(&rule_with_condition("Sun in 13th house"));
        assert!(values_of(&keys, KeyType::PlanetHouse).is_empty());
    }
}
