//! Multi-scale enhancement driver.
//!
//! The [`MultiScaleEnhancer`] runs, for every sigma in a [`SigmaSchedule`]:
//! eigen-analysis, parameter estimation, measure application and max-abs
//! fusion into the output volume. Scales are processed one after another;
//! each stage inside a scale is parallel over z-slices.
//!
//! Typical usage:
//! ```no_run
//! use sheet_enhance::{EnhanceParams, MultiScaleEnhancer, SigmaSchedule};
//! use sheet_enhance::volume::VolumeF32;
//!
//! # fn example(volume: VolumeF32) -> sheet_enhance::Result<()> {
//! let sigmas = SigmaSchedule::logarithmic(0.75, 3.0, 4)?;
//! let enhancer = MultiScaleEnhancer::new(EnhanceParams::default());
//! let result = enhancer.run(&volume, &sigmas, None)?;
//! println!("{:?}", result.output.min_max());
//! # Ok(())
//! # }
//! ```
use super::params::EnhanceParams;
use crate::combine::ScaleCombiner;
use crate::diagnostics::{
    elapsed_ms, EnhancementReport, InputDescriptor, ScaleReport, TimingBreakdown,
};
use crate::error::{EnhanceError, Result};
use crate::hessian::{EigenAnalysis, GaussianHessianEigen};
use crate::mask::{check_domain, count_inside, rasterize, Mask, VoxelMask};
use crate::measure::apply_measure_masked;
use crate::sigma::SigmaSchedule;
use crate::volume::VolumeF32;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Reported to the progress callback after each completed scale.
#[derive(Clone, Copy, Debug)]
pub struct ScaleProgress {
    /// Zero-based index of the scale just finished.
    pub index: usize,
    pub total: usize,
    pub sigma: f64,
    pub elapsed_ms: f64,
}

/// Fused response plus diagnostics.
#[derive(Clone, Debug)]
pub struct EnhancementOutput {
    pub output: VolumeF32,
    pub report: EnhancementReport,
    /// Per-scale responses, in schedule order; empty unless requested.
    pub scale_responses: Vec<VolumeF32>,
}

pub struct MultiScaleEnhancer {
    params: EnhanceParams,
    abort: Arc<AtomicBool>,
}

impl MultiScaleEnhancer {
    pub fn new(params: EnhanceParams) -> Self {
        Self {
            params,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn params(&self) -> &EnhanceParams {
        &self.params
    }

    /// Shared flag; setting it stops the run before the next scale starts.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    /// Run with the built-in Gaussian Hessian eigen-analysis.
    pub fn run(
        &self,
        volume: &VolumeF32,
        sigmas: &SigmaSchedule,
        mask: Option<&dyn Mask>,
    ) -> Result<EnhancementOutput> {
        let stage = GaussianHessianEigen::new(self.params.hessian);
        self.run_with(&stage, volume, sigmas, mask)
    }

    pub fn run_with(
        &self,
        stage: &dyn EigenAnalysis,
        volume: &VolumeF32,
        sigmas: &SigmaSchedule,
        mask: Option<&dyn Mask>,
    ) -> Result<EnhancementOutput> {
        self.run_with_progress(stage, volume, sigmas, mask, |_| {})
    }

    /// Full entry point: custom eigen stage and a per-scale progress callback.
    pub fn run_with_progress(
        &self,
        stage: &dyn EigenAnalysis,
        volume: &VolumeF32,
        sigmas: &SigmaSchedule,
        mask: Option<&dyn Mask>,
        mut progress: impl FnMut(&ScaleProgress),
    ) -> Result<EnhancementOutput> {
        let total_start = Instant::now();
        let voxel_mask = self.validate(volume, sigmas, mask)?;
        let masked_voxels = voxel_mask.as_ref().map(count_inside);
        debug!(
            "MultiScaleEnhancer::run start dims={:?} scales={} masked={:?}",
            volume.dims(),
            sigmas.len(),
            masked_voxels
        );

        let total = sigmas.len();
        let mut combiner = ScaleCombiner::new();
        let mut scales = Vec::with_capacity(total);
        let mut scale_responses = Vec::new();

        for (index, sigma) in sigmas.iter().enumerate() {
            if self.abort.load(Ordering::Relaxed) {
                debug!("MultiScaleEnhancer::run aborted before scale {index}");
                return Err(EnhanceError::Aborted {
                    completed_scales: index,
                });
            }
            let scale_start = Instant::now();
            let mut timings = TimingBreakdown::default();

            let t = Instant::now();
            let eigen = stage.eigenvalues(volume, sigma)?;
            if !eigen.same_lattice(volume) {
                return Err(EnhanceError::invalid(format!(
                    "eigen stage returned lattice {} for volume {}",
                    eigen.geometry(),
                    volume.geometry()
                )));
            }
            timings.push("eigen", elapsed_ms(t));

            let t = Instant::now();
            let estimate = self
                .params
                .estimator
                .estimate_masked(&eigen, voxel_mask.as_ref())?;
            timings.push("estimate", elapsed_ms(t));

            let t = Instant::now();
            let response = apply_measure_masked(
                &eigen,
                &estimate.parameters,
                self.params.functor,
                self.params.direction,
                voxel_mask.as_ref(),
            )?;
            timings.push("measure", elapsed_ms(t));
            drop(eigen);

            let range = response.min_max();
            let t = Instant::now();
            if self.params.keep_scale_responses {
                scale_responses.push(response.clone());
            }
            combiner.push(response)?;
            timings.push("combine", elapsed_ms(t));
            timings.total_ms = elapsed_ms(scale_start);

            debug!(
                "MultiScaleEnhancer::run scale {}/{} sigma={:.4} params=({:.4}, {:.4}, {:.4}) included={} {:.1} ms",
                index + 1,
                total,
                sigma,
                estimate.parameters.alpha,
                estimate.parameters.beta,
                estimate.parameters.scale,
                estimate.included,
                timings.total_ms
            );
            progress(&ScaleProgress {
                index,
                total,
                sigma,
                elapsed_ms: timings.total_ms,
            });
            scales.push(ScaleReport {
                index,
                sigma,
                parameters: estimate.parameters,
                included_voxels: estimate.included,
                response_min: range.map(|r| r.0),
                response_max: range.map(|r| r.1),
                timings,
            });
        }

        let output = combiner
            .finish()
            .ok_or_else(|| EnhanceError::invalid("sigma schedule produced no scales"))?;
        let range = output.min_max();
        let timings = TimingBreakdown::with_total(elapsed_ms(total_start));
        debug!(
            "MultiScaleEnhancer::run done range={:?} {:.1} ms",
            range, timings.total_ms
        );
        let report = EnhancementReport {
            input: InputDescriptor::new(volume.geometry(), masked_voxels),
            estimator: self.params.estimator,
            functor: self.params.functor,
            direction: self.params.direction,
            sigmas: sigmas.values().to_vec(),
            scales,
            output_min: range.map(|r| r.0),
            output_max: range.map(|r| r.1),
            timings,
        };
        Ok(EnhancementOutput {
            output,
            report,
            scale_responses,
        })
    }

    /// Argument and domain checks; rasterises the mask on success.
    fn validate(
        &self,
        volume: &VolumeF32,
        sigmas: &SigmaSchedule,
        mask: Option<&dyn Mask>,
    ) -> Result<Option<VoxelMask>> {
        if volume.is_empty() {
            return Err(EnhanceError::invalid("input volume has no voxels"));
        }
        volume.geometry().validate()?;
        if sigmas.is_empty() {
            return Err(EnhanceError::invalid("sigma schedule must not be empty"));
        }
        match mask {
            Some(m) => {
                check_domain(m, volume.geometry())?;
                Ok(Some(rasterize(m, volume.geometry())))
            }
            None => Ok(None),
        }
    }
}
