//! The rule model: the atomic unit of domain knowledge.
//!
//! A rule pairs a classical condition ("10th lord in 10th house") with an
//! effect, carries an authority weight and a citation anchor, and may name
//! other rules that cancel it.

mod enums;
mod weight;

pub use enums::{ChartContext, Domain, RuleStatus, Scope};
pub use weight::Weight;

use serde::{Deserialize, Serialize};

/// A condition/effect pair with an authority weight and citation anchor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    /// Stable identifier, e.g. "BPHS_24_13".
    pub id: String,
    /// Life domain this rule speaks to.
    pub domain: Domain,
    /// Which chart the condition reads.
    pub chart_context: ChartContext,
    /// Application scope: natal promise, dasha activation, or transit trigger.
    pub scope: Scope,
    /// The condition text, e.g. "Sun in 11th house".
    pub condition: String,
    /// The stated effect when the condition holds.
    pub effect: String,
    /// Ordered qualifiers that strengthen or soften the effect.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Authority weight in [0, 1].
    pub weight: Weight,
    /// Citation anchor into the source text, e.g. "BPHS 24.13".
    pub source: String,
    /// Original-language text, if preserved from the source.
    #[serde(default)]
    pub original_text: Option<String>,
    /// Translation of the original text.
    #[serde(default)]
    pub translation: Option<String>,
    /// Commentary attached during curation.
    #[serde(default)]
    pub commentary: Option<String>,
    /// Divisional charts this rule may be applied to.
    #[serde(default)]
    pub applicable_variants: Vec<ChartContext>,
    /// Rule that must also hold for this one to apply.
    #[serde(default)]
    pub prerequisite: Option<String>,
    /// Rules that suppress this one when they match more strongly.
    #[serde(default)]
    pub cancels: Vec<String>,
    /// Monotonically increasing revision counter.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Lifecycle status. Deprecated rules stay stored for citation provenance.
    #[serde(default)]
    pub status: RuleStatus,
}

fn default_version() -> u32 {
    1
}

impl Rule {
    /// Whether retrieval should see this rule at all.
    pub fn is_retrievable(&self) -> bool {
        self.status == RuleStatus::Active
    }

    /// The text that gets embedded: condition + effect + modifiers.
    pub fn embedding_text(&self) -> String {
        let mut text = format!("{} {}", self.condition, self.effect);
        for m in &self.modifiers {
            text.push(' ');
            text.push_str(m);
        }
        text
    }
}

/// The kind of symbolic key, fixing how `key_value` is formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    /// "Sun_11" — planet occupying a house.
    PlanetHouse,
    /// "10_lord_in_10" — a house lord's placement.
    HouseLord,
    /// "Sun_Capricorn" — planet occupying a sign.
    PlanetSign,
    /// "gajakesari_yoga" — a named combination.
    Yoga,
    /// "career" — domain tag.
    Domain,
    /// "dasha" — scope tag.
    Scope,
    /// "d9" — chart context tag.
    ChartContext,
}

/// An exact-match index entry. Many keys point at one rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolicKey {
    pub key_type: KeyType,
    pub key_value: String,
    pub rule_id: String,
}

impl SymbolicKey {
    pub fn new(key_type: KeyType, key_value: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self {
            key_type,
            key_value: key_value.into(),
            rule_id: rule_id.into(),
        }
    }
}

/// A precomputed embedding for one rule, tagged with the model that made it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEmbedding {
    pub rule_id: String,
    pub vector: Vec<f32>,
    pub model: String,
}
