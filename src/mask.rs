//! Spatial masks restricting where parameters are estimated and where the
//! measure is evaluated.
//!
//! A [`Mask`] answers point-in-region queries in physical space. Before a run
//! the engine rasterises it once onto the volume lattice ([`VoxelMask`]), so
//! the per-scale stages only look up a boolean per voxel.
use crate::error::{EnhanceError, Result};
use crate::slabs;
use crate::volume::{Aabb, Volume, VolumeGeometry};
use nalgebra::Point3;

/// Point-in-region test in physical coordinates.
pub trait Mask: Sync {
    fn is_inside(&self, point: &Point3<f64>) -> bool;

    /// Physical box enclosing every inside point; `None` for an empty region.
    fn physical_bounds(&self) -> Option<Aabb>;
}

/// Per-voxel inclusion flags on a volume lattice.
pub type VoxelMask = Volume<bool>;

/// Label volume mask: a point is inside when the label of its nearest voxel
/// differs from the background label.
#[derive(Clone, Debug)]
pub struct LabelMask {
    labels: Volume<u16>,
    background: u16,
    bounds: Option<Aabb>,
}

impl LabelMask {
    pub fn new(labels: Volume<u16>, background: u16) -> Self {
        let bounds = foreground_bounds(&labels, background);
        Self {
            labels,
            background,
            bounds,
        }
    }

    pub fn labels(&self) -> &Volume<u16> {
        &self.labels
    }

    pub fn background(&self) -> u16 {
        self.background
    }
}

impl Mask for LabelMask {
    fn is_inside(&self, point: &Point3<f64>) -> bool {
        match self.labels.geometry().physical_to_index(point) {
            Some([x, y, z]) => self.labels.get(x, y, z) != self.background,
            None => false,
        }
    }

    fn physical_bounds(&self) -> Option<Aabb> {
        self.bounds
    }
}

fn foreground_bounds(labels: &Volume<u16>, background: u16) -> Option<Aabb> {
    let [nx, ny, nz] = labels.dims();
    let mut lo = [usize::MAX; 3];
    let mut hi = [0usize; 3];
    let mut any = false;
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                if labels.get(x, y, z) == background {
                    continue;
                }
                any = true;
                for (axis, v) in [x, y, z].into_iter().enumerate() {
                    lo[axis] = lo[axis].min(v);
                    hi[axis] = hi[axis].max(v);
                }
            }
        }
    }
    any.then(|| labels.geometry().index_range_bounds(lo, hi))
}

/// Axis-aligned box region (faces inclusive).
#[derive(Clone, Copy, Debug)]
pub struct BoxMask {
    pub bounds: Aabb,
}

impl BoxMask {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self {
            bounds: Aabb::new(min, max),
        }
    }
}

impl Mask for BoxMask {
    fn is_inside(&self, point: &Point3<f64>) -> bool {
        self.bounds.contains_point(point)
    }

    fn physical_bounds(&self) -> Option<Aabb> {
        Some(self.bounds)
    }
}

/// Closed ball region.
#[derive(Clone, Copy, Debug)]
pub struct SphereMask {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl SphereMask {
    pub fn new(center: [f64; 3], radius: f64) -> Self {
        Self {
            center: Point3::from(center),
            radius: radius.abs(),
        }
    }
}

impl Mask for SphereMask {
    fn is_inside(&self, point: &Point3<f64>) -> bool {
        nalgebra::distance_squared(&self.center, point) <= self.radius * self.radius
    }

    fn physical_bounds(&self) -> Option<Aabb> {
        let c = self.center;
        let r = self.radius;
        Some(Aabb::new(
            [c.x - r, c.y - r, c.z - r],
            [c.x + r, c.y + r, c.z + r],
        ))
    }
}

/// Fail with `DomainMismatch` unless the mask region fits inside the lattice.
///
/// Empty mask regions always fit. The tolerance absorbs rounding in the
/// half-voxel margins.
pub fn check_domain(mask: &dyn Mask, geometry: &VolumeGeometry) -> Result<()> {
    let Some(mask_bounds) = mask.physical_bounds() else {
        return Ok(());
    };
    let Some(volume_bounds) = geometry.physical_bounds() else {
        return Err(EnhanceError::DomainMismatch {
            mask: mask_bounds.to_string(),
            volume: "<empty>".to_string(),
        });
    };
    let tol = 1e-6 * geometry.spacing.iter().copied().fold(0.0f64, f64::max);
    if volume_bounds.contains_box(&mask_bounds, tol) {
        Ok(())
    } else {
        Err(EnhanceError::DomainMismatch {
            mask: mask_bounds.to_string(),
            volume: volume_bounds.to_string(),
        })
    }
}

/// Evaluate `mask` at every voxel centre of `geometry`.
pub fn rasterize(mask: &dyn Mask, geometry: &VolumeGeometry) -> VoxelMask {
    let mut out = Volume::filled(*geometry, false);
    let [nx, ny, _] = geometry.dims;
    slabs::for_each_slice_mut(out.data_mut(), geometry.slice_len(), |z, slice| {
        for y in 0..ny {
            for x in 0..nx {
                slice[x + nx * y] = mask.is_inside(&geometry.index_to_physical(x, y, z));
            }
        }
    });
    out
}

/// Number of voxels flagged inside.
pub fn count_inside(mask: &VoxelMask) -> usize {
    mask.data().iter().filter(|&&inside| inside).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_mask_uses_background_label() {
        let g = VolumeGeometry::new([4, 4, 4]);
        let labels = Volume::from_fn(g, |x, y, z| if x == 1 && y == 2 && z < 3 { 7u16 } else { 0 });
        let mask = LabelMask::new(labels, 0);
        assert!(mask.is_inside(&Point3::new(1.0, 2.0, 0.0)));
        assert!(mask.is_inside(&Point3::new(1.2, 1.8, 2.4)));
        assert!(!mask.is_inside(&Point3::new(0.0, 0.0, 0.0)));
        assert!(!mask.is_inside(&Point3::new(-5.0, 2.0, 0.0)));

        let b = mask.physical_bounds().expect("foreground present");
        assert_eq!(b.min, [0.5, 1.5, -0.5]);
        assert_eq!(b.max, [1.5, 2.5, 2.5]);
    }

    #[test]
    fn all_background_label_mask_is_empty() {
        let g = VolumeGeometry::new([3, 3, 3]);
        let mask = LabelMask::new(Volume::filled(g, 3u16), 3);
        assert!(mask.physical_bounds().is_none());
        assert!(check_domain(&mask, &VolumeGeometry::new([1, 1, 1])).is_ok());
        assert_eq!(count_inside(&rasterize(&mask, &g)), 0);
    }

    #[test]
    fn domain_check_rejects_mask_beyond_volume() {
        let g = VolumeGeometry::new([10, 10, 10]);
        assert!(check_domain(&BoxMask::new([0.0; 3], [9.0; 3]), &g).is_ok());
        assert!(check_domain(&SphereMask::new([4.5; 3], 5.0), &g).is_ok());
        let err = check_domain(&BoxMask::new([0.0; 3], [12.0, 3.0, 3.0]), &g).unwrap_err();
        assert!(matches!(err, EnhanceError::DomainMismatch { .. }));
    }

    #[test]
    fn rasterized_sphere_is_symmetric() {
        let g = VolumeGeometry::new([9, 9, 9]);
        let vm = rasterize(&SphereMask::new([4.0; 3], 2.0), &g);
        assert!(vm.get(4, 4, 4));
        assert!(vm.get(2, 4, 4) && vm.get(6, 4, 4));
        assert!(!vm.get(1, 4, 4) && !vm.get(7, 4, 4));
        assert_eq!(count_inside(&vm), 33);
    }
}
