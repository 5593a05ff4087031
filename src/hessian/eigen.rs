//! Magnitude-ordered Hessian eigenvalues.
use super::tensor::HessianField;
use crate::error::{EnhanceError, Result};
use crate::slabs;
use crate::volume::Volume;
use nalgebra::SymmetricEigen;

/// Signed eigenvalues ordered so that `|λ1| ≤ |λ2| ≤ |λ3|`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Eigenvalues([f32; 3]);

pub type EigenvalueField = Volume<Eigenvalues>;

impl Eigenvalues {
    /// Sort arbitrary eigenvalues by magnitude.
    pub fn from_unordered(mut values: [f32; 3]) -> Self {
        values.sort_by(|a, b| a.abs().total_cmp(&b.abs()));
        Self(values)
    }

    /// Accept values already ordered by magnitude.
    pub fn new_ordered(values: [f32; 3]) -> Result<Self> {
        let [a, b, c] = values.map(f32::abs);
        if a <= b && b <= c {
            Ok(Self(values))
        } else {
            Err(EnhanceError::invalid(format!(
                "eigenvalues {values:?} are not ordered by magnitude"
            )))
        }
    }

    #[inline]
    pub fn values(&self) -> [f32; 3] {
        self.0
    }

    /// Signed eigenvalues as `f64`, smallest magnitude first.
    #[inline]
    pub fn lambdas(&self) -> [f64; 3] {
        self.0.map(f64::from)
    }

    /// Magnitudes `[l1, l2, l3]`.
    #[inline]
    pub fn magnitudes(&self) -> [f64; 3] {
        self.0.map(|v| f64::from(v).abs())
    }

    /// Signed eigenvalue of largest magnitude.
    #[inline]
    pub fn lambda3(&self) -> f64 {
        f64::from(self.0[2])
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.lambdas().iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

/// Eigen-decompose every voxel tensor of `hessian`.
pub fn eigenvalues_of(hessian: &HessianField) -> EigenvalueField {
    let geometry = *hessian.geometry();
    let mut out: EigenvalueField = Volume::new(geometry);
    let slice_len = geometry.slice_len();
    slabs::for_each_slice_mut(out.data_mut(), slice_len, |z, slice| {
        for (dst, tensor) in slice.iter_mut().zip(hessian.slice(z)) {
            let eig = SymmetricEigen::new(tensor.to_matrix());
            let ev = eig.eigenvalues;
            *dst = Eigenvalues::from_unordered([ev[0] as f32, ev[1] as f32, ev[2] as f32]);
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hessian::tensor::SymmetricTensor3;
    use crate::volume::VolumeGeometry;

    #[test]
    fn unordered_values_sort_by_magnitude() {
        let e = Eigenvalues::from_unordered([-5.0, 0.5, 2.0]);
        assert_eq!(e.values(), [0.5, 2.0, -5.0]);
        assert_eq!(e.lambda3(), -5.0);
        assert_eq!(e.magnitudes(), [0.5, 2.0, 5.0]);
    }

    #[test]
    fn ordered_constructor_validates() {
        assert!(Eigenvalues::new_ordered([0.0, -1.0, 1.0]).is_ok());
        assert!(Eigenvalues::new_ordered([2.0, -1.0, 3.0]).is_err());
    }

    #[test]
    fn decomposition_orders_every_voxel() {
        let g = VolumeGeometry::new([2, 2, 2]);
        let tensor = SymmetricTensor3 {
            xx: 3.0,
            xy: 0.0,
            xz: 0.0,
            yy: -0.5,
            yz: 0.0,
            zz: -7.0,
        };
        let field = Volume::filled(g, tensor);
        let eig = eigenvalues_of(&field);
        for e in eig.data() {
            let [a, b, c] = e.values();
            assert!((a + 0.5).abs() < 1e-5);
            assert!((b - 3.0).abs() < 1e-5);
            assert!((c + 7.0).abs() < 1e-5);
        }
    }

    #[test]
    fn off_diagonal_tensor_is_diagonalised() {
        let t = SymmetricTensor3 {
            xx: 2.0,
            xy: 1.0,
            ..Default::default()
        };
        let g = VolumeGeometry::new([1, 1, 1]);
        let e = eigenvalues_of(&Volume::filled(g, t)).get(0, 0, 0);
        // [[2,1],[1,0]] has eigenvalues 1 ± √2
        let [l1, l2, l3] = e.lambdas();
        assert!(l1.abs() < 1e-6);
        assert!((l2 - (1.0 - 2f64.sqrt())).abs() < 1e-5);
        assert!((l3 - (1.0 + 2f64.sqrt())).abs() < 1e-5);
    }
}
