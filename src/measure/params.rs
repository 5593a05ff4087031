use crate::error::{EnhanceError, Result};
use serde::{Deserialize, Serialize};

/// Polarity of the structures to enhance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhanceDirection {
    /// Bright sheets on a dark background (λ3 < 0 at the sheet).
    #[default]
    Bright,
    /// Dark sheets on a bright background.
    Dark,
}

impl EnhanceDirection {
    /// `-1` for bright structures, `+1` for dark ones.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            EnhanceDirection::Bright => -1.0,
            EnhanceDirection::Dark => 1.0,
        }
    }
}

/// `(α, β, scale)` consumed by a measure functor.
///
/// `scale` is `c` for sheet-blob-noise and `γ` for sheet-tube-noise.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureParameters {
    pub alpha: f64,
    pub beta: f64,
    pub scale: f64,
}

impl MeasureParameters {
    pub fn new(alpha: f64, beta: f64, scale: f64) -> Self {
        Self { alpha, beta, scale }
    }

    /// Build from a flat parameter list of exactly three values.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [alpha, beta, scale] => Ok(Self::new(*alpha, *beta, *scale)),
            _ => Err(EnhanceError::invalid(format!(
                "expected 3 measure parameters, got {}",
                values.len()
            ))),
        }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.alpha, self.beta, self.scale]
    }
}
