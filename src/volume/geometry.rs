//! Lattice geometry: voxel counts plus the physical placement of the grid.
//!
//! Voxel `(x, y, z)` sits at `origin + (x, y, z) ⊙ spacing` (identity
//! direction cosines). The physical region covered by a lattice spans the
//! voxel centres expanded by half a voxel on every side.
use crate::error::{EnhanceError, Result};
use nalgebra::{Point3, Vector3};
use serde::Serialize;
use std::fmt;

/// Axis-aligned physical box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Aabb {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        let mut lo = min;
        let mut hi = max;
        for axis in 0..3 {
            if lo[axis] > hi[axis] {
                std::mem::swap(&mut lo[axis], &mut hi[axis]);
            }
        }
        Self { min: lo, max: hi }
    }

    #[inline]
    pub fn contains_point(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|a| p[a] >= self.min[a] && p[a] <= self.max[a])
    }

    /// True when `other` lies inside `self`, allowing `tol` slack per face.
    pub fn contains_box(&self, other: &Aabb, tol: f64) -> bool {
        (0..3).all(|a| other.min[a] >= self.min[a] - tol && other.max[a] <= self.max[a] + tol)
    }

    /// Smallest box enclosing both operands.
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        for a in 0..3 {
            out.min[a] = out.min[a].min(other.min[a]);
            out.max[a] = out.max[a].max(other.max[a]);
        }
        out
    }

    pub fn extent(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.4}, {:.4}, {:.4}]..[{:.4}, {:.4}, {:.4}]",
            self.min[0], self.min[1], self.min[2], self.max[0], self.max[1], self.max[2]
        )
    }
}

/// Voxel counts and physical placement of a dense 3D lattice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeGeometry {
    /// Number of voxels along x, y, z.
    pub dims: [usize; 3],
    /// Physical distance between neighbouring voxel centres per axis.
    pub spacing: Vector3<f64>,
    /// Physical position of voxel `(0, 0, 0)`.
    pub origin: Vector3<f64>,
}

impl VolumeGeometry {
    /// Unit spacing, zero origin.
    pub fn new(dims: [usize; 3]) -> Self {
        Self {
            dims,
            spacing: Vector3::new(1.0, 1.0, 1.0),
            origin: Vector3::zeros(),
        }
    }

    pub fn with_spacing(mut self, spacing: [f64; 3]) -> Self {
        self.spacing = Vector3::from(spacing);
        self
    }

    pub fn with_origin(mut self, origin: [f64; 3]) -> Self {
        self.origin = Vector3::from(origin);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of voxels in one z-slice.
    #[inline]
    pub fn slice_len(&self) -> usize {
        self.dims[0] * self.dims[1]
    }

    /// Reject non-finite or non-positive spacing and non-finite origins.
    pub fn validate(&self) -> Result<()> {
        if self.spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(EnhanceError::invalid(format!(
                "voxel spacing must be finite and positive, got {:?}",
                self.spacing.as_slice()
            )));
        }
        if self.origin.iter().any(|o| !o.is_finite()) {
            return Err(EnhanceError::invalid(format!(
                "volume origin must be finite, got {:?}",
                self.origin.as_slice()
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn index_to_physical(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        Point3::new(
            self.origin[0] + x as f64 * self.spacing[0],
            self.origin[1] + y as f64 * self.spacing[1],
            self.origin[2] + z as f64 * self.spacing[2],
        )
    }

    /// Continuous (fractional) voxel coordinates of a physical point.
    #[inline]
    pub fn physical_to_continuous_index(&self, p: &Point3<f64>) -> Vector3<f64> {
        Vector3::new(
            (p[0] - self.origin[0]) / self.spacing[0],
            (p[1] - self.origin[1]) / self.spacing[1],
            (p[2] - self.origin[2]) / self.spacing[2],
        )
    }

    /// Nearest voxel index of a physical point, `None` when outside the lattice.
    pub fn physical_to_index(&self, p: &Point3<f64>) -> Option<[usize; 3]> {
        let c = self.physical_to_continuous_index(p);
        let mut out = [0usize; 3];
        for axis in 0..3 {
            let r = c[axis].round();
            if !r.is_finite() || r < 0.0 || r >= self.dims[axis] as f64 {
                return None;
            }
            out[axis] = r as usize;
        }
        Some(out)
    }

    /// Physical box covering a voxel index range (inclusive), half a voxel wide
    /// beyond the outermost centres.
    pub fn index_range_bounds(&self, lo: [usize; 3], hi: [usize; 3]) -> Aabb {
        let mut min = [0.0; 3];
        let mut max = [0.0; 3];
        for axis in 0..3 {
            let half = 0.5 * self.spacing[axis];
            min[axis] = self.origin[axis] + lo[axis] as f64 * self.spacing[axis] - half;
            max[axis] = self.origin[axis] + hi[axis] as f64 * self.spacing[axis] + half;
        }
        Aabb::new(min, max)
    }

    /// Physical region covered by the whole lattice; `None` for empty lattices.
    pub fn physical_bounds(&self) -> Option<Aabb> {
        if self.is_empty() {
            return None;
        }
        Some(self.index_range_bounds(
            [0, 0, 0],
            [self.dims[0] - 1, self.dims[1] - 1, self.dims[2] - 1],
        ))
    }

    /// Same voxel counts, spacing and origin (up to a relative tolerance).
    pub fn same_lattice(&self, other: &VolumeGeometry) -> bool {
        const TOL: f64 = 1e-9;
        self.dims == other.dims
            && (0..3).all(|a| {
                let ds = (self.spacing[a] - other.spacing[a]).abs();
                let dor = (self.origin[a] - other.origin[a]).abs();
                ds <= TOL * self.spacing[a].abs().max(1.0) && dor <= TOL * self.spacing[a].abs().max(1.0)
            })
    }
}

impl fmt::Display for VolumeGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{} @ spacing ({:.4}, {:.4}, {:.4})",
            self.dims[0], self.dims[1], self.dims[2], self.spacing[0], self.spacing[1], self.spacing[2]
        )
    }
}
