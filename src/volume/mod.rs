//! Dense 3D voxel storage with physical geometry.
//!
//! [`Volume<T>`] is used for every field the engine touches: the input
//! intensities, the per-scale Hessian and eigenvalue fields, rasterised masks
//! and the response/output fields. All of them share one lattice
//! ([`VolumeGeometry`]) per run.

pub mod geometry;
pub mod grid;
pub mod io;

pub use self::geometry::{Aabb, VolumeGeometry};
pub use self::grid::{Volume, VolumeF32};
