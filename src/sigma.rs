//! Scale schedules for the multi-scale enhancer.
//!
//! A [`SigmaSchedule`] is an ordered, non-empty list of finite positive
//! Gaussian scales (physical units). Generated schedules are ascending;
//! explicit lists keep the caller's order.
//!
//! Generation rules shared by both step methods:
//! - zero steps is rejected outright;
//! - equal bounds collapse to a single scale whatever the step count;
//! - reversed bounds are swapped, so `(max, min, n)` equals `(min, max, n)`;
//! - one step on a non-degenerate range yields just the lower bound.
use crate::error::{EnhanceError, Result};
use serde::{Deserialize, Serialize};

/// Spacing rule between consecutive generated scales.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigmaStepMethod {
    /// Constant difference between consecutive scales.
    #[default]
    Equispaced,
    /// Constant ratio between consecutive scales.
    Logarithmic,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SigmaSchedule(Vec<f64>);

impl SigmaSchedule {
    /// Validate an explicit list of scales.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(EnhanceError::invalid("sigma schedule must not be empty"));
        }
        if let Some(bad) = values.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(EnhanceError::invalid(format!(
                "sigma values must be finite and positive, got {bad}"
            )));
        }
        Ok(Self(values))
    }

    /// `n` scales evenly spaced between the bounds, inclusive.
    pub fn equispaced(sigma_min: f64, sigma_max: f64, steps: usize) -> Result<Self> {
        Self::generate(sigma_min, sigma_max, steps, SigmaStepMethod::Equispaced)
    }

    /// `n` scales with a constant ratio between the bounds, inclusive.
    pub fn logarithmic(sigma_min: f64, sigma_max: f64, steps: usize) -> Result<Self> {
        Self::generate(sigma_min, sigma_max, steps, SigmaStepMethod::Logarithmic)
    }

    pub fn generate(
        sigma_min: f64,
        sigma_max: f64,
        steps: usize,
        method: SigmaStepMethod,
    ) -> Result<Self> {
        if steps == 0 {
            return Err(EnhanceError::invalid(
                "number of sigma steps must be at least one",
            ));
        }
        for bound in [sigma_min, sigma_max] {
            if !bound.is_finite() || bound <= 0.0 {
                return Err(EnhanceError::invalid(format!(
                    "sigma bounds must be finite and positive, got {bound}"
                )));
            }
        }
        let (lo, hi) = if sigma_min <= sigma_max {
            (sigma_min, sigma_max)
        } else {
            (sigma_max, sigma_min)
        };
        if lo == hi || steps == 1 {
            return Ok(Self(vec![lo]));
        }

        let last = (steps - 1) as f64;
        let values = match method {
            SigmaStepMethod::Equispaced => {
                let step = (hi - lo) / last;
                (0..steps).map(|i| lo + i as f64 * step).collect::<Vec<_>>()
            }
            SigmaStepMethod::Logarithmic => {
                let (ln_lo, ln_hi) = (lo.ln(), hi.ln());
                let step = (ln_hi - ln_lo) / last;
                (0..steps)
                    .map(|i| (ln_lo + i as f64 * step).exp())
                    .collect::<Vec<_>>()
            }
        };
        Ok(Self(pin_endpoints(values, lo, hi)))
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

fn pin_endpoints(mut values: Vec<f64>, lo: f64, hi: f64) -> Vec<f64> {
    if let Some(first) = values.first_mut() {
        *first = lo;
    }
    if let Some(last) = values.last_mut() {
        *last = hi;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len(), "length mismatch: {actual:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= tol, "expected {expected:?}, got {actual:?}");
        }
    }

    #[test]
    fn zero_steps_is_rejected() {
        for method in [SigmaStepMethod::Equispaced, SigmaStepMethod::Logarithmic] {
            let err = SigmaSchedule::generate(5.0, 5.0, 0, method).unwrap_err();
            assert!(matches!(err, EnhanceError::InvalidArgument(_)));
            assert!(SigmaSchedule::generate(1.0, 5.0, 0, method).is_err());
        }
    }

    #[test]
    fn equal_bounds_collapse_to_single_scale() {
        assert_eq!(SigmaSchedule::equispaced(1.0, 1.0, 100).unwrap().values(), &[1.0]);
        assert_eq!(SigmaSchedule::logarithmic(1.0, 1.0, 100).unwrap().values(), &[1.0]);
    }

    #[test]
    fn equispaced_hits_integers_exactly() {
        let s = SigmaSchedule::equispaced(1.0, 5.0, 5).unwrap();
        assert_eq!(s.values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn logarithmic_has_constant_ratio() {
        let s = SigmaSchedule::logarithmic(1.0, 5.0, 5).unwrap();
        assert_close(
            s.values(),
            &[1.0, 1.4953487812212205, 2.23606797749979, 3.3437015248821096, 5.0],
            1e-6,
        );
    }

    #[test]
    fn reversed_bounds_match_forward_order() {
        for method in [SigmaStepMethod::Equispaced, SigmaStepMethod::Logarithmic] {
            let fwd = SigmaSchedule::generate(0.7, 3.1, 6, method).unwrap();
            let rev = SigmaSchedule::generate(3.1, 0.7, 6, method).unwrap();
            assert_eq!(fwd, rev);
            assert!(fwd.values().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn single_step_on_range_keeps_lower_bound() {
        assert_eq!(SigmaSchedule::logarithmic(4.0, 2.0, 1).unwrap().values(), &[2.0]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(SigmaSchedule::from_values(vec![]).is_err());
        assert!(SigmaSchedule::from_values(vec![1.0, -0.5]).is_err());
        assert!(SigmaSchedule::from_values(vec![f64::NAN]).is_err());
        assert!(SigmaSchedule::equispaced(0.0, 2.0, 3).is_err());
        assert_eq!(
            SigmaSchedule::from_values(vec![2.0, 1.0]).unwrap().values(),
            &[2.0, 1.0]
        );
    }
}
