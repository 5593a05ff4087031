//! Per-voxel sheetness formulas.
//!
//! Both formulas work on the eigenvalue magnitudes `l1 ≤ l2 ≤ l3` and use the
//! sign of λ3 for polarity. Degenerate denominators (`l3` or `l2` below
//! machine epsilon) give 0, and any non-finite intermediate result is
//! reported as 0.
use super::params::{EnhanceDirection, MeasureParameters};
use crate::hessian::Eigenvalues;
use serde::{Deserialize, Serialize};

const EPS: f64 = f64::EPSILON;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureFunctor {
    /// Sheet vs. blob vs. noise; non-negative, zero for the wrong polarity.
    #[default]
    SheetBlobNoise,
    /// Sheet vs. tube vs. noise; signed by polarity.
    SheetTubeNoise,
}

impl MeasureFunctor {
    pub fn measure(
        self,
        eigenvalues: &Eigenvalues,
        params: &MeasureParameters,
        direction: EnhanceDirection,
    ) -> f64 {
        let value = match self {
            MeasureFunctor::SheetBlobNoise => sheet_blob_noise(eigenvalues, params, direction),
            MeasureFunctor::SheetTubeNoise => sheet_tube_noise(eigenvalues, params, direction),
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

/// `1 - exp(-x² / d)`, with `x == 0 && d == 0` treated as no noise.
#[inline]
fn noise_term(x: f64, denom: f64) -> f64 {
    if denom == 0.0 {
        return if x == 0.0 { 0.0 } else { 1.0 };
    }
    1.0 - (-(x * x) / denom).exp()
}

fn sheet_blob_noise(e: &Eigenvalues, p: &MeasureParameters, direction: EnhanceDirection) -> f64 {
    if direction.sign() * e.lambda3() < 0.0 {
        return 0.0;
    }
    let [l1, l2, l3] = e.magnitudes();
    if l3 < EPS {
        return 0.0;
    }
    let r_sheet = l2 / l3;
    let r_blob = (2.0 * l3 - l2 - l1).abs() / l3;
    let r_noise = (l1 * l1 + l2 * l2 + l3 * l3).sqrt();

    let sheet = (-(r_sheet * r_sheet) / (2.0 * p.alpha * p.alpha)).exp();
    let blob = 1.0 - (-(r_blob * r_blob) / (2.0 * p.beta * p.beta)).exp();
    sheet * blob * noise_term(r_noise, 2.0 * p.scale * p.scale)
}

fn sheet_tube_noise(e: &Eigenvalues, p: &MeasureParameters, direction: EnhanceDirection) -> f64 {
    let [l1, l2, l3] = e.magnitudes();
    if l3 < EPS || l2 < EPS {
        return 0.0;
    }
    let r_sheet = l2 / l3;
    let r_noise = l1 + l2 + l3;
    let r_tube = l1 / (l2 * l3);

    let polarity = direction.sign() * e.lambda3().signum();
    let sheet = (-(r_sheet * r_sheet) / (p.alpha * p.alpha)).exp();
    let tube = (-(r_tube * r_tube) / (p.beta * p.beta)).exp();
    polarity * sheet * tube * noise_term(r_noise, p.scale * p.scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(values: [f32; 3]) -> Eigenvalues {
        Eigenvalues::new_ordered(values).unwrap()
    }

    const HALF_SQRT2: f64 = std::f64::consts::SQRT_2 * 0.5;

    #[test]
    fn sheet_blob_noise_reference_value() {
        let p = MeasureParameters::new(0.5, 0.5, 0.25);
        let m = MeasureFunctor::SheetBlobNoise.measure(
            &ev([0.25, 1.0, -1.0]),
            &p,
            EnhanceDirection::Bright,
        );
        assert!((m - 0.0913983).abs() < 1e-6, "{m}");
    }

    #[test]
    fn sheet_blob_noise_zero_for_wrong_polarity() {
        let p = MeasureParameters::new(0.5, 0.5, 0.25);
        let e = ev([0.0, 0.1, 5.0]);
        assert_eq!(MeasureFunctor::SheetBlobNoise.measure(&e, &p, EnhanceDirection::Bright), 0.0);
        assert!(MeasureFunctor::SheetBlobNoise.measure(&e, &p, EnhanceDirection::Dark) > 0.0);
    }

    #[test]
    fn sheet_tube_noise_saturates_for_ideal_sheet() {
        let p = MeasureParameters::new(HALF_SQRT2, HALF_SQRT2, HALF_SQRT2);
        let bright = EnhanceDirection::Bright;
        let up = MeasureFunctor::SheetTubeNoise.measure(&ev([0.0, 1000.0, 1e8]), &p, bright);
        let down = MeasureFunctor::SheetTubeNoise.measure(&ev([0.0, -1000.0, -1e8]), &p, bright);
        assert!((up + 1.0).abs() < 1e-6, "{up}");
        assert!((down - 1.0).abs() < 1e-6, "{down}");
    }

    #[test]
    fn degenerate_eigenvalues_give_zero() {
        let p = MeasureParameters::new(0.5, 0.5, 1.0);
        for f in [MeasureFunctor::SheetBlobNoise, MeasureFunctor::SheetTubeNoise] {
            for dir in [EnhanceDirection::Bright, EnhanceDirection::Dark] {
                assert_eq!(f.measure(&ev([0.0, 0.0, 0.0]), &p, dir), 0.0);
            }
        }
        // l2 below epsilon only matters for sheet-tube-noise
        let e = ev([0.0, 0.0, -2.0]);
        assert_eq!(MeasureFunctor::SheetTubeNoise.measure(&e, &p, EnhanceDirection::Bright), 0.0);
    }

    #[test]
    fn zero_scale_never_produces_nan() {
        let p = MeasureParameters::new(0.5, 0.5, 0.0);
        let e = ev([0.1, 0.2, -3.0]);
        for f in [MeasureFunctor::SheetBlobNoise, MeasureFunctor::SheetTubeNoise] {
            let m = f.measure(&e, &p, EnhanceDirection::Bright);
            assert!(m.is_finite() && m > 0.0, "{f:?} -> {m}");
        }
        let zero_params = MeasureParameters::new(0.0, 0.0, 0.0);
        let m = MeasureFunctor::SheetTubeNoise.measure(&e, &zero_params, EnhanceDirection::Bright);
        assert!(m.is_finite());
    }
}
