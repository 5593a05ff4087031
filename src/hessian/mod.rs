//! Scale-space Hessian and its eigen-analysis.
//!
//! Purpose
//! - Compute the Gaussian-derivative Hessian of a volume at a physical scale.
//! - Reduce each voxel tensor to three signed eigenvalues ordered by magnitude.
//!
//! Design
//! - Separable correlation with sampled Gaussian derivative kernels, sigma
//!   converted to voxels per axis so anisotropic spacing yields derivatives in
//!   physical units.
//! - Fifteen 1D passes per scale (three along z, six along y, six along x),
//!   each parallel over output z-slices.
//! - Optional σ² normalisation so responses at different scales are comparable.
//!
//! The [`EigenAnalysis`] trait is the seam the enhancer depends on; swapping in
//! another implementation only requires producing an [`EigenvalueField`].

pub mod eigen;
pub mod gaussian;
pub mod options;
pub mod stage;
pub mod tensor;

pub use eigen::{eigenvalues_of, EigenvalueField, Eigenvalues};
pub use options::HessianOptions;
pub use stage::{EigenAnalysis, GaussianHessianEigen};
pub use tensor::{hessian_at, HessianField, SymmetricTensor3};
