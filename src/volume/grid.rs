//! Owned dense 3D voxel buffer in x-fastest order (`x + nx·(y + ny·z)`).
//!
//! The buffer length always matches the geometry's voxel count. z-slices are
//! contiguous, which is what the slab-parallel stages split on.
use super::geometry::VolumeGeometry;
use crate::error::{EnhanceError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Volume<T> {
    geometry: VolumeGeometry,
    data: Vec<T>,
}

/// Scalar intensity or response volume.
pub type VolumeF32 = Volume<f32>;

impl<T: Copy + Default> Volume<T> {
    /// Default-initialised buffer for the given lattice.
    pub fn new(geometry: VolumeGeometry) -> Self {
        Self::filled(geometry, T::default())
    }
}

impl<T: Copy> Volume<T> {
    pub fn filled(geometry: VolumeGeometry, value: T) -> Self {
        Self {
            geometry,
            data: vec![value; geometry.len()],
        }
    }

    /// Wrap an existing buffer; its length must match the voxel count.
    pub fn from_vec(geometry: VolumeGeometry, data: Vec<T>) -> Result<Self> {
        if data.len() != geometry.len() {
            return Err(EnhanceError::invalid(format!(
                "buffer holds {} voxels but geometry {} needs {}",
                data.len(),
                geometry,
                geometry.len()
            )));
        }
        Ok(Self { geometry, data })
    }

    /// Build a volume by evaluating `f(x, y, z)` at every voxel.
    pub fn from_fn(geometry: VolumeGeometry, mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let [nx, ny, nz] = geometry.dims;
        let mut data = Vec::with_capacity(geometry.len());
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    data.push(f(x, y, z));
                }
            }
        }
        Self { geometry, data }
    }

    #[inline]
    pub fn geometry(&self) -> &VolumeGeometry {
        &self.geometry
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.geometry.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    /// Linear index of voxel `(x, y, z)`.
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        let [nx, ny, _] = self.geometry.dims;
        x + nx * (y + ny * z)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> T {
        self.data[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, v: T) {
        let i = self.idx(x, y, z);
        self.data[i] = v;
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Contiguous voxels of slice `z`.
    #[inline]
    pub fn slice(&self, z: usize) -> &[T] {
        let n = self.geometry.slice_len();
        &self.data[z * n..(z + 1) * n]
    }

    /// Same lattice as `other`, regardless of voxel type.
    pub fn same_lattice<U>(&self, other: &Volume<U>) -> bool {
        self.geometry.same_lattice(&other.geometry)
    }

    /// Voxel-wise transform onto the same lattice.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Volume<U> {
        Volume {
            geometry: self.geometry,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl Volume<f32> {
    /// Smallest and largest finite sample, `None` when no finite sample exists.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
