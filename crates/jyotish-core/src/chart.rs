//! Chart facts as supplied by the external chart provider.
//!
//! The engine never computes positions; it consumes them as opaque
//! structured input keyed by profile id + chart version. BTreeMaps keep
//! iteration (and therefore symbolic key derivation) deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rule::ChartContext;

/// The nine grahas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Planet {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    Rahu,
    Ketu,
}

impl Planet {
    pub const ALL: [Planet; 9] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Mars,
        Planet::Mercury,
        Planet::Jupiter,
        Planet::Venus,
        Planet::Saturn,
        Planet::Rahu,
        Planet::Ketu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Planet::Sun => "Sun",
            Planet::Moon => "Moon",
            Planet::Mars => "Mars",
            Planet::Mercury => "Mercury",
            Planet::Jupiter => "Jupiter",
            Planet::Venus => "Venus",
            Planet::Saturn => "Saturn",
            Planet::Rahu => "Rahu",
            Planet::Ketu => "Ketu",
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Planet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Sun" => Ok(Planet::Sun),
            "Moon" => Ok(Planet::Moon),
            "Mars" => Ok(Planet::Mars),
            "Mercury" => Ok(Planet::Mercury),
            "Jupiter" => Ok(Planet::Jupiter),
            "Venus" => Ok(Planet::Venus),
            "Saturn" => Ok(Planet::Saturn),
            "Rahu" => Ok(Planet::Rahu),
            "Ketu" => Ok(Planet::Ketu),
            other => Err(format!("unknown planet: {other}")),
        }
    }
}

/// The twelve rasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }

    /// Classical sign rulership. The nodes rule no sign.
    pub fn lord(&self) -> Planet {
        match self {
            Sign::Aries | Sign::Scorpio => Planet::Mars,
            Sign::Taurus | Sign::Libra => Planet::Venus,
            Sign::Gemini | Sign::Virgo => Planet::Mercury,
            Sign::Cancer => Planet::Moon,
            Sign::Leo => Planet::Sun,
            Sign::Sagittarius | Sign::Pisces => Planet::Jupiter,
            Sign::Capricorn | Sign::Aquarius => Planet::Saturn,
        }
    }

    /// Zero-based index in zodiacal order.
    pub fn index(&self) -> u8 {
        Sign::ALL.iter().position(|s| s == self).unwrap_or(0) as u8
    }

    /// The sign `offset` places ahead in zodiacal order (wrapping).
    pub fn advance(&self, offset: u8) -> Sign {
        Sign::ALL[((self.index() as usize) + offset as usize) % 12]
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planet's placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub sign: Sign,
    /// House counted from the ascendant, 1..=12.
    pub house: u8,
    /// Degree within the sign, when the provider supplies it.
    #[serde(default)]
    pub degree: Option<f64>,
}

/// Structured chart facts from the chart provider, keyed by
/// profile id + chart version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFacts {
    pub profile_id: String,
    pub chart_version: u32,
    /// Placement of every supplied planet.
    pub positions: BTreeMap<Planet, PlanetPosition>,
    /// Rising sign.
    pub ascendant: Sign,
    /// Current major time-period ruler (opaque external fact).
    pub dasha_ruler: Planet,
    /// Divisional chart placements, when supplied.
    #[serde(default)]
    pub divisional: BTreeMap<ChartContext, BTreeMap<Planet, PlanetPosition>>,
}

impl ChartFacts {
    /// The sign occupying the given house (counted from the ascendant).
    pub fn sign_in_house(&self, house: u8) -> Sign {
        self.ascendant.advance(house.saturating_sub(1) % 12)
    }

    /// The house a planet occupies, if the planet is placed.
    pub fn house_of(&self, planet: Planet) -> Option<u8> {
        self.positions.get(&planet).map(|p| p.house)
    }

    /// One-line chart summary used for semantic query embedding.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("ascendant {}", self.ascendant)];
        for (planet, pos) in &self.positions {
            parts.push(format!("{} in {} in house {}", planet, pos.sign, pos.house));
        }
        parts.push(format!("{} dasha running", self.dasha_ruler));
        parts.join(", ")
    }
}
