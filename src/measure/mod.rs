//! Sheetness measures and automatic parameter estimation.
//!
//! Per scale the enhancer first reduces the eigenvalue field to a
//! [`MeasureParameters`] triple with a [`ParameterEstimator`], then maps every
//! voxel through a [`MeasureFunctor`]. The canonical pairings are
//! Frobenius-norm estimation with sheet-blob-noise and trace estimation with
//! sheet-tube-noise.

pub mod apply;
pub mod estimator;
pub mod functor;
pub mod params;

pub use apply::{apply_measure, apply_measure_masked};
pub use estimator::{EstimationOutcome, ParameterEstimator, TraceMode};
pub use functor::MeasureFunctor;
pub use params::{EnhanceDirection, MeasureParameters};
