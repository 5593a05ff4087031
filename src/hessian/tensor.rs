//! Per-voxel symmetric Hessian and its separable computation.
use super::gaussian::{axis_kernel, correlate_axis, Axis};
use super::options::HessianOptions;
use crate::error::{EnhanceError, Result};
use crate::volume::{Volume, VolumeF32};
use nalgebra::Matrix3;

/// Upper triangle of a symmetric 3×3 matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SymmetricTensor3 {
    pub xx: f32,
    pub xy: f32,
    pub xz: f32,
    pub yy: f32,
    pub yz: f32,
    pub zz: f32,
}

impl SymmetricTensor3 {
    pub fn to_matrix(&self) -> Matrix3<f64> {
        let (xx, xy, xz) = (self.xx as f64, self.xy as f64, self.xz as f64);
        let (yy, yz, zz) = (self.yy as f64, self.yz as f64, self.zz as f64);
        Matrix3::new(xx, xy, xz, xy, yy, yz, xz, yz, zz)
    }
}

pub type HessianField = Volume<SymmetricTensor3>;

/// Derivative taps of orders 0..=2 along one axis, in physical units.
struct AxisKernels([Vec<f32>; 3]);

impl AxisKernels {
    fn new(sigma: f64, spacing: f64, truncate: f64, axis_len: usize) -> Result<Self> {
        let sigma_px = sigma / spacing;
        let mut kernels: [Vec<f32>; 3] = Default::default();
        for (order, slot) in kernels.iter_mut().enumerate() {
            let scale = spacing.powi(order as i32) as f32;
            *slot = axis_kernel(sigma_px, order as u8, truncate, axis_len)?
                .into_iter()
                .map(|w| w / scale)
                .collect();
        }
        Ok(Self(kernels))
    }

    fn order(&self, order: usize) -> &[f32] {
        &self.0[order]
    }
}

#[derive(Clone, Copy, Debug)]
enum Component {
    Xx,
    Xy,
    Yy,
    Xz,
    Yz,
    Zz,
}

impl Component {
    const ALL: [Component; 6] = [
        Component::Xx,
        Component::Xy,
        Component::Yy,
        Component::Xz,
        Component::Yz,
        Component::Zz,
    ];

    /// Derivative order along x, y and z.
    fn orders(self) -> [usize; 3] {
        match self {
            Component::Xx => [2, 0, 0],
            Component::Xy => [1, 1, 0],
            Component::Yy => [0, 2, 0],
            Component::Xz => [1, 0, 1],
            Component::Yz => [0, 1, 1],
            Component::Zz => [0, 0, 2],
        }
    }

    fn store(self, t: &mut SymmetricTensor3, v: f32) {
        match self {
            Component::Xx => t.xx = v,
            Component::Xy => t.xy = v,
            Component::Yy => t.yy = v,
            Component::Xz => t.xz = v,
            Component::Yz => t.yz = v,
            Component::Zz => t.zz = v,
        }
    }
}

/// Gaussian-derivative Hessian at physical scale `sigma`.
///
/// Components are grouped by their z-derivative order: one z pass per group
/// (three in total), then one y and one x pass per component. Each
/// intermediate is dropped once its components are stored, so at most three
/// scalar volumes are alive next to the output.
pub fn hessian_at(volume: &VolumeF32, sigma: f64, options: &HessianOptions) -> Result<HessianField> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(EnhanceError::invalid(format!(
            "sigma must be finite and positive, got {sigma}"
        )));
    }
    volume.geometry().validate()?;
    let spacing = volume.geometry().spacing;
    let dims = volume.dims();
    let [kx, ky, kz] = Axis::ALL.map(|axis| {
        let i = axis.index();
        AxisKernels::new(sigma, spacing[i], options.truncate, dims[i])
    });
    let (kx, ky, kz) = (kx?, ky?, kz?);

    let norm = if options.normalize_across_scale {
        (sigma * sigma) as f32
    } else {
        1.0
    };
    let mut field: HessianField = Volume::new(*volume.geometry());
    for dz in 0..=2 {
        let z_pass = correlate_axis(volume, Axis::Z, kz.order(dz));
        for component in Component::ALL.into_iter().filter(|c| c.orders()[2] == dz) {
            let [dx, dy, _] = component.orders();
            let y_pass = correlate_axis(&z_pass, Axis::Y, ky.order(dy));
            let values = correlate_axis(&y_pass, Axis::X, kx.order(dx));
            drop(y_pass);
            for (t, v) in field.data_mut().iter_mut().zip(values.data()) {
                component.store(t, v * norm);
            }
        }
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::VolumeGeometry;

    fn unnormalised() -> HessianOptions {
        HessianOptions::default().with_normalize_across_scale(false)
    }

    #[test]
    fn quadratic_form_recovers_constant_hessian() {
        let g = VolumeGeometry::new([15, 15, 15]);
        // f = 0.5·x² + 2·y² - z² + 0.25·x·y  →  H = [[1, .25, 0], [.25, 4, 0], [0, 0, -2]]
        let v = Volume::from_fn(g, |x, y, z| {
            let (x, y, z) = (x as f32 - 7.0, y as f32 - 7.0, z as f32 - 7.0);
            0.5 * x * x + 2.0 * y * y - z * z + 0.25 * x * y
        });
        let h = hessian_at(&v, 1.0, &unnormalised()).unwrap().get(7, 7, 7);
        assert!((h.xx - 1.0).abs() < 1e-2, "{h:?}");
        assert!((h.yy - 4.0).abs() < 1e-2, "{h:?}");
        assert!((h.zz + 2.0).abs() < 1e-2, "{h:?}");
        assert!((h.xy - 0.25).abs() < 1e-2, "{h:?}");
        assert!(h.xz.abs() < 1e-2 && h.yz.abs() < 1e-2, "{h:?}");
    }

    #[test]
    fn anisotropic_spacing_yields_physical_derivatives() {
        let g = VolumeGeometry::new([9, 9, 17]).with_spacing([1.0, 1.0, 0.5]);
        // f(zp) = zp² with zp = 0.5·z  →  ∂²f/∂zp² = 2
        let v = Volume::from_fn(g, |_, _, z| {
            let zp = 0.5 * (z as f32 - 8.0);
            zp * zp
        });
        let h = hessian_at(&v, 1.0, &unnormalised()).unwrap().get(4, 4, 8);
        assert!((h.zz - 2.0).abs() < 1e-2, "{h:?}");
        assert!(h.xx.abs() < 1e-3, "{h:?}");
    }

    #[test]
    fn scale_normalisation_multiplies_by_sigma_squared() {
        let g = VolumeGeometry::new([21, 3, 3]);
        let v = Volume::from_fn(g, |x, _, _| {
            let x = x as f32 - 10.0;
            x * x
        });
        let raw = hessian_at(&v, 2.0, &unnormalised()).unwrap().get(10, 1, 1);
        let norm = hessian_at(&v, 2.0, &HessianOptions::default())
            .unwrap()
            .get(10, 1, 1);
        assert!((norm.xx - 4.0 * raw.xx).abs() < 1e-3);
    }

    #[test]
    fn rejects_non_positive_sigma() {
        let v = Volume::filled(VolumeGeometry::new([3, 3, 3]), 0.0f32);
        assert!(hessian_at(&v, 0.0, &HessianOptions::default()).is_err());
        assert!(hessian_at(&v, f64::NAN, &HessianOptions::default()).is_err());
    }

    #[test]
    fn large_sigma_on_short_axes_stays_finite() {
        let g = VolumeGeometry::new([4, 3, 2]);
        let v = Volume::from_fn(g, |x, y, z| (x + 2 * y + 3 * z) as f32);
        let h = hessian_at(&v, 1e4, &HessianOptions::default()).unwrap();
        assert_eq!(h.dims(), [4, 3, 2]);
        for t in h.data() {
            let m = t.to_matrix();
            assert!(m.iter().all(|c| c.is_finite()), "{t:?}");
        }
        assert!(hessian_at(&v, 1e300, &HessianOptions::default()).is_err());
    }
}
