use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Authority weight constrained to [0.0, 1.0].
///
/// Unlike a clamping newtype, `new` rejects out-of-range values: the
/// ingestion boundary must fail loudly on malformed rules rather than
/// silently repairing them.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    /// Create a weight, rejecting values outside [0, 1] or non-finite.
    pub fn new(value: f64) -> Result<Self, StoreError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(StoreError::InvalidWeight { value });
        }
        Ok(Self(value))
    }

    /// Create a weight by clamping into [0, 1]. For derived scores only,
    /// never for ingestion input.
    pub fn clamped(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Weight {
    type Error = StoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weight> for f64 {
    fn from(w: Weight) -> Self {
        w.0
    }
}
