use super::functor::MeasureFunctor;
use super::params::{EnhanceDirection, MeasureParameters};
use crate::error::{EnhanceError, Result};
use crate::hessian::EigenvalueField;
use crate::mask::{rasterize, Mask, VoxelMask};
use crate::slabs;
use crate::volume::{Volume, VolumeF32};

/// Evaluate `functor` at every voxel of `field`; voxels outside `mask` are 0.
pub fn apply_measure(
    field: &EigenvalueField,
    params: &MeasureParameters,
    functor: MeasureFunctor,
    direction: EnhanceDirection,
    mask: Option<&dyn Mask>,
) -> Result<VolumeF32> {
    let voxels = mask.map(|m| rasterize(m, field.geometry()));
    apply_measure_masked(field, params, functor, direction, voxels.as_ref())
}

pub fn apply_measure_masked(
    field: &EigenvalueField,
    params: &MeasureParameters,
    functor: MeasureFunctor,
    direction: EnhanceDirection,
    mask: Option<&VoxelMask>,
) -> Result<VolumeF32> {
    if let Some(m) = mask {
        if !m.same_lattice(field) {
            return Err(EnhanceError::invalid(format!(
                "mask lattice {} differs from eigenvalue field {}",
                m.geometry(),
                field.geometry()
            )));
        }
    }
    let geometry = *field.geometry();
    let mut out: VolumeF32 = Volume::new(geometry);
    slabs::for_each_slice_mut(out.data_mut(), geometry.slice_len(), |z, slice| {
        let eig = field.slice(z);
        let inside = mask.map(|m| m.slice(z));
        for (i, dst) in slice.iter_mut().enumerate() {
            if inside.is_some_and(|flags| !flags[i]) {
                continue;
            }
            *dst = functor.measure(&eig[i], params, direction) as f32;
        }
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hessian::Eigenvalues;
    use crate::mask::SphereMask;
    use crate::volume::VolumeGeometry;

    #[test]
    fn outside_mask_is_zero() {
        let g = VolumeGeometry::new([5, 5, 5]);
        let sheet = Eigenvalues::from_unordered([0.0, 0.05, -2.0]);
        let field = Volume::filled(g, sheet);
        let params = MeasureParameters::new(0.5, 0.5, 0.5);
        let mask = SphereMask::new([2.0, 2.0, 2.0], 1.0);
        let out = apply_measure(
            &field,
            &params,
            MeasureFunctor::SheetBlobNoise,
            EnhanceDirection::Bright,
            Some(&mask),
        )
        .unwrap();
        assert!(out.get(2, 2, 2) > 0.5);
        assert!(out.get(2, 2, 3) > 0.5);
        assert_eq!(out.get(0, 0, 0), 0.0);
        assert_eq!(out.get(4, 2, 2), 0.0);

        let unmasked = apply_measure(
            &field,
            &params,
            MeasureFunctor::SheetBlobNoise,
            EnhanceDirection::Bright,
            None,
        )
        .unwrap();
        assert!(unmasked.data().iter().all(|v| *v > 0.5));
    }
}
