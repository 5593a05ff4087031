//! Automatic estimation of measure parameters from an eigenvalue field.
//!
//! Estimation is a single commutative reduction over the included voxels
//! (all voxels, or those inside the mask). Per-slice accumulators are merged
//! after the parallel join, so the result does not depend on visiting order.
use super::params::MeasureParameters;
use crate::error::{EnhanceError, Result};
use crate::hessian::{EigenvalueField, Eigenvalues};
use crate::mask::{rasterize, Mask, VoxelMask};
use crate::slabs;
use log::warn;
use serde::{Deserialize, Serialize};

const HALF_SQRT2: f64 = std::f64::consts::SQRT_2 * 0.5;

/// Which per-voxel trace is averaged by [`ParameterEstimator::Trace`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    /// Sum of eigenvalue magnitudes; α = β = γ₀ = √2/2.
    #[default]
    Implementation,
    /// Signed eigenvalue sum; α = β = 0.5, γ₀ = 0.25.
    Journal,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterEstimator {
    /// `c = weight · max ‖λ‖`, α = β = 0.5.
    FrobeniusNorm {
        #[serde(default = "default_frobenius_weight")]
        weight: f64,
    },
    /// `γ = γ₀ · mean trace`.
    Trace {
        #[serde(default)]
        mode: TraceMode,
    },
}

fn default_frobenius_weight() -> f64 {
    0.5
}

impl Default for ParameterEstimator {
    fn default() -> Self {
        ParameterEstimator::FrobeniusNorm {
            weight: default_frobenius_weight(),
        }
    }
}

/// Estimated parameters and the size of the population they came from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationOutcome {
    pub parameters: MeasureParameters,
    pub included: usize,
}

#[derive(Clone, Copy, Debug, Default)]
struct Accumulator {
    max_norm: f64,
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn merge(self, other: Self) -> Self {
        Self {
            max_norm: self.max_norm.max(other.max_norm),
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }
}

impl ParameterEstimator {
    pub fn trace(mode: TraceMode) -> Self {
        ParameterEstimator::Trace { mode }
    }

    pub fn frobenius(weight: f64) -> Self {
        ParameterEstimator::FrobeniusNorm { weight }
    }

    /// Estimate from `field`, restricted to `mask` when given.
    pub fn estimate(
        &self,
        field: &EigenvalueField,
        mask: Option<&dyn Mask>,
    ) -> Result<EstimationOutcome> {
        let voxels = mask.map(|m| rasterize(m, field.geometry()));
        self.estimate_masked(field, voxels.as_ref())
    }

    /// Same as [`estimate`](Self::estimate) with a mask already on the lattice.
    pub fn estimate_masked(
        &self,
        field: &EigenvalueField,
        mask: Option<&VoxelMask>,
    ) -> Result<EstimationOutcome> {
        if let Some(m) = mask {
            if !m.same_lattice(field) {
                return Err(EnhanceError::invalid(format!(
                    "mask lattice {} differs from eigenvalue field {}",
                    m.geometry(),
                    field.geometry()
                )));
            }
        }
        let contribution = |e: &Eigenvalues| -> f64 {
            match self {
                ParameterEstimator::FrobeniusNorm { .. } => e.frobenius_norm(),
                ParameterEstimator::Trace { mode } => match mode {
                    TraceMode::Implementation => e.magnitudes().iter().sum(),
                    TraceMode::Journal => e.lambdas().iter().sum(),
                },
            }
        };
        let acc = slabs::map_reduce(
            field.data(),
            field.geometry().slice_len(),
            Accumulator::default,
            |mut acc, z, slice| {
                let inside = mask.map(|m| m.slice(z));
                for (i, e) in slice.iter().enumerate() {
                    if inside.is_some_and(|flags| !flags[i]) {
                        continue;
                    }
                    let v = contribution(e);
                    acc.max_norm = acc.max_norm.max(v);
                    acc.sum += v;
                    acc.count += 1;
                }
                acc
            },
            Accumulator::merge,
        );
        if acc.count == 0 {
            warn!("parameter estimation saw no voxels; noise scale set to 0");
        }
        Ok(EstimationOutcome {
            parameters: self.finish(&acc),
            included: acc.count,
        })
    }

    fn finish(&self, acc: &Accumulator) -> MeasureParameters {
        match *self {
            ParameterEstimator::FrobeniusNorm { weight } => {
                let c = if acc.max_norm > 0.0 {
                    weight * acc.max_norm
                } else {
                    0.0
                };
                MeasureParameters::new(0.5, 0.5, c)
            }
            ParameterEstimator::Trace { mode } => {
                let average = if acc.count > 0 {
                    acc.sum / acc.count as f64
                } else {
                    0.0
                };
                let (alpha, beta, gamma) = match mode {
                    TraceMode::Implementation => (HALF_SQRT2, HALF_SQRT2, HALF_SQRT2),
                    TraceMode::Journal => (0.5, 0.5, 0.25),
                };
                MeasureParameters::new(alpha, beta, gamma * average)
            }
        }
    }
}
