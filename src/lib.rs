#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod enhancer;
pub mod error;
pub mod mask;
pub mod measure;
pub mod sigma;
pub mod volume;

// Building blocks used by the enhancer; public for tools and custom stages.
pub mod combine;
pub mod config;
pub mod hessian;
pub mod preprocess;
pub mod slabs;

// --- High-level re-exports -------------------------------------------------

// Main entry points: enhancer + parameters.
pub use crate::enhancer::{
    EnhanceParams, EnhancementMethod, EnhancementOutput, MultiScaleEnhancer, ScaleProgress,
};
pub use crate::error::{EnhanceError, Result};
pub use crate::sigma::{SigmaSchedule, SigmaStepMethod};

// Seams for custom eigen-analysis and masks.
pub use crate::hessian::{EigenAnalysis, EigenvalueField, Eigenvalues, GaussianHessianEigen};
pub use crate::mask::{BoxMask, LabelMask, Mask, SphereMask};

// Measure building blocks.
pub use crate::measure::{
    EnhanceDirection, MeasureFunctor, MeasureParameters, ParameterEstimator, TraceMode,
};
pub use crate::volume::{Volume, VolumeF32, VolumeGeometry};

// High-level diagnostics returned by the enhancer.
pub use crate::diagnostics::{EnhancementReport, ScaleReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use sheet_enhance::prelude::*;
///
/// # fn main() -> sheet_enhance::Result<()> {
/// let geometry = VolumeGeometry::new([64, 64, 32]);
/// let volume = Volume::from_fn(geometry, |_, _, z| if z == 16 { 1.0 } else { 0.0 });
///
/// let enhancer = MultiScaleEnhancer::new(EnhanceParams::default());
/// let result = enhancer.run(&volume, &SigmaSchedule::equispaced(1.0, 2.0, 3)?, None)?;
/// println!("peak={:?}", result.output.min_max());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::volume::{Volume, VolumeF32, VolumeGeometry};
    pub use crate::{
        EnhanceDirection, EnhanceParams, EnhancementMethod, MultiScaleEnhancer, SigmaSchedule,
    };
}
