//! The eigen-analysis seam used by the multi-scale enhancer.
use super::eigen::{eigenvalues_of, EigenvalueField};
use super::options::HessianOptions;
use super::tensor::hessian_at;
use crate::error::Result;
use crate::volume::VolumeF32;

/// Produces a magnitude-ordered eigenvalue field for one scale.
///
/// The enhancer calls this once per sigma. Implementations must return a
/// field on the same lattice as `volume`.
pub trait EigenAnalysis: Sync {
    fn eigenvalues(&self, volume: &VolumeF32, sigma: f64) -> Result<EigenvalueField>;
}

/// Gaussian-derivative Hessian followed by a symmetric eigensolve.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaussianHessianEigen {
    pub options: HessianOptions,
}

impl GaussianHessianEigen {
    pub fn new(options: HessianOptions) -> Self {
        Self { options }
    }
}

impl EigenAnalysis for GaussianHessianEigen {
    fn eigenvalues(&self, volume: &VolumeF32, sigma: f64) -> Result<EigenvalueField> {
        let hessian = hessian_at(volume, sigma, &self.options)?;
        Ok(eigenvalues_of(&hessian))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::{Volume, VolumeGeometry};

    #[test]
    fn bright_plate_has_large_negative_lambda3() {
        let g = VolumeGeometry::new([11, 11, 11]);
        let v = Volume::from_fn(g, |_, _, z| if z == 5 { 100.0 } else { 0.0 });
        let field = GaussianHessianEigen::default().eigenvalues(&v, 1.0).unwrap();
        assert!(field.same_lattice(&v));
        let centre = field.get(5, 5, 5);
        let [l1, l2, l3] = centre.lambdas();
        assert!(l3 < 0.0);
        assert!(l1.abs() < 1e-3 && l2.abs() < 1e-3, "{centre:?}");
    }
}
