//! Parameters configuring a multi-scale enhancement run.
use crate::hessian::HessianOptions;
use crate::measure::{EnhanceDirection, MeasureFunctor, ParameterEstimator, TraceMode};
use serde::{Deserialize, Serialize};

/// Canonical estimator/functor pairings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementMethod {
    /// Frobenius-norm estimation with the sheet-blob-noise measure.
    #[default]
    SheetBlobNoise,
    /// Trace estimation with the signed sheet-tube-noise measure.
    SheetTubeNoise,
}

impl EnhancementMethod {
    pub fn estimator(self) -> ParameterEstimator {
        match self {
            EnhancementMethod::SheetBlobNoise => ParameterEstimator::default(),
            EnhancementMethod::SheetTubeNoise => ParameterEstimator::trace(TraceMode::default()),
        }
    }

    pub fn functor(self) -> MeasureFunctor {
        match self {
            EnhancementMethod::SheetBlobNoise => MeasureFunctor::SheetBlobNoise,
            EnhancementMethod::SheetTubeNoise => MeasureFunctor::SheetTubeNoise,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EnhanceParams {
    pub estimator: ParameterEstimator,
    pub functor: MeasureFunctor,
    pub direction: EnhanceDirection,
    pub hessian: HessianOptions,
    /// Return every per-scale response next to the fused output.
    pub keep_scale_responses: bool,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self::for_method(EnhancementMethod::default())
    }
}

impl EnhanceParams {
    pub fn for_method(method: EnhancementMethod) -> Self {
        Self {
            estimator: method.estimator(),
            functor: method.functor(),
            direction: EnhanceDirection::default(),
            hessian: HessianOptions::default(),
            keep_scale_responses: false,
        }
    }

    pub fn with_estimator(mut self, estimator: ParameterEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_functor(mut self, functor: MeasureFunctor) -> Self {
        self.functor = functor;
        self
    }

    pub fn with_direction(mut self, direction: EnhanceDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_hessian(mut self, hessian: HessianOptions) -> Self {
        self.hessian = hessian;
        self
    }

    pub fn with_keep_scale_responses(mut self, keep: bool) -> Self {
        self.keep_scale_responses = keep;
        self
    }
}
