//! Closed classification enums, validated at ingestion and retrieval
//! boundaries. Serialized as snake_case strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Life domains a rule or query can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Career,
    Marriage,
    Wealth,
    Health,
    Education,
    Children,
    Spirituality,
    General,
}

impl Domain {
    /// All domains, in canonical order.
    pub const ALL: [Domain; 8] = [
        Domain::Career,
        Domain::Marriage,
        Domain::Wealth,
        Domain::Health,
        Domain::Education,
        Domain::Children,
        Domain::Spirituality,
        Domain::General,
    ];

    /// snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Career => "career",
            Domain::Marriage => "marriage",
            Domain::Wealth => "wealth",
            Domain::Health => "health",
            Domain::Education => "education",
            Domain::Children => "children",
            Domain::Spirituality => "spirituality",
            Domain::General => "general",
        }
    }

    /// Houses classically associated with the domain, used by the
    /// prediction prompt builder.
    pub fn houses(&self) -> &'static [u8] {
        match self {
            Domain::Career => &[10, 11, 6],
            Domain::Marriage => &[7, 2, 11],
            Domain::Wealth => &[2, 11, 5, 9],
            Domain::Health => &[1, 6, 8, 12],
            Domain::Education => &[4, 5, 9],
            Domain::Children => &[5, 9],
            Domain::Spirituality => &[9, 12, 5],
            Domain::General => &[1, 9, 10],
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    /// Lenient parse for router output: case-insensitive, accepts the
    /// common synonyms the reasoning collaborator tends to emit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().trim_matches(|c: char| !c.is_alphanumeric());
        match norm.to_ascii_lowercase().as_str() {
            "career" | "profession" | "job" | "work" => Ok(Domain::Career),
            "marriage" | "relationship" | "relationships" | "partner" => Ok(Domain::Marriage),
            "wealth" | "finance" | "finances" | "money" => Ok(Domain::Wealth),
            "health" => Ok(Domain::Health),
            "education" | "studies" | "learning" => Ok(Domain::Education),
            "children" | "progeny" => Ok(Domain::Children),
            "spirituality" | "spiritual" | "dharma" => Ok(Domain::Spirituality),
            "general" | "overall" | "life" => Ok(Domain::General),
            other => Err(format!("unknown domain: {other}")),
        }
    }
}

/// Application scope of a rule. Narrowness increases downward: a natal
/// promise is broad, a dasha activation is period-bound, a transit
/// trigger is the narrowest window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Natal,
    Dasha,
    Transit,
}

impl Scope {
    /// Narrowness rank. Higher = narrower, used by the cancellation
    /// tie-break (the narrower rule survives an equal-relevance tie).
    pub fn narrowness(&self) -> u8 {
        match self {
            Scope::Natal => 0,
            Scope::Dasha => 1,
            Scope::Transit => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Natal => "natal",
            Scope::Dasha => "dasha",
            Scope::Transit => "transit",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "natal" => Ok(Scope::Natal),
            "dasha" => Ok(Scope::Dasha),
            "transit" => Ok(Scope::Transit),
            other => Err(format!("unknown scope: {other}")),
        }
    }
}

/// Which chart a rule's condition reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartContext {
    /// The main birth chart (D1).
    Rasi,
    /// The D9 divisional chart.
    Navamsa,
    /// The D10 divisional chart.
    Dasamsa,
    /// Applicable to any chart.
    Any,
}

impl ChartContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartContext::Rasi => "d1",
            ChartContext::Navamsa => "d9",
            ChartContext::Dasamsa => "d10",
            ChartContext::Any => "any",
        }
    }
}

impl fmt::Display for ChartContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "d1" | "rasi" => Ok(ChartContext::Rasi),
            "d9" | "navamsa" => Ok(ChartContext::Navamsa),
            "d10" | "dasamsa" => Ok(ChartContext::Dasamsa),
            "any" => Ok(ChartContext::Any),
            other => Err(format!("unknown chart context: {other}")),
        }
    }
}

/// Rule lifecycle. Deprecated rules are never hard-deleted so that past
/// citations keep resolving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Draft,
    #[default]
    Active,
    Deprecated,
}

impl RuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleStatus::Draft => "draft",
            RuleStatus::Active => "active",
            RuleStatus::Deprecated => "deprecated",
        }
    }
}

impl FromStr for RuleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(RuleStatus::Draft),
            "active" => Ok(RuleStatus::Active),
            "deprecated" => Ok(RuleStatus::Deprecated),
            other => Err(format!("unknown rule status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_parse_is_lenient() {
        assert_eq!("Career".parse::<Domain>(), Ok(Domain::Career));
        assert_eq!(" finances ".parse::<Domain>(), Ok(Domain::Wealth));
        assert_eq!("\"health\"".parse::<Domain>(), Ok(Domain::Health));
        assert!("astrology".parse::<Domain>().is_err());
    }

    #[test]
    fn scope_narrowness_ordering() {
        assert!(Scope::Transit.narrowness() > Scope::Dasha.narrowness());
        assert!(Scope::Dasha.narrowness() > Scope::Natal.narrowness());
    }
}
