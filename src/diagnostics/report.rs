use super::timing::TimingBreakdown;
use crate::measure::{EnhanceDirection, MeasureFunctor, MeasureParameters, ParameterEstimator};
use crate::volume::VolumeGeometry;
use serde::Serialize;

/// What happened at one scale of a run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleReport {
    pub index: usize,
    pub sigma: f64,
    pub parameters: MeasureParameters,
    /// Voxels that fed parameter estimation.
    pub included_voxels: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_min: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_max: Option<f32>,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub dims: [usize; 3],
    pub spacing: [f64; 3],
    pub origin: [f64; 3],
    pub masked_voxels: Option<usize>,
}

impl InputDescriptor {
    pub fn new(geometry: &VolumeGeometry, masked_voxels: Option<usize>) -> Self {
        Self {
            dims: geometry.dims,
            spacing: geometry.spacing.into(),
            origin: geometry.origin.into(),
            masked_voxels,
        }
    }
}

/// Serializable summary of a full multi-scale run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementReport {
    pub input: InputDescriptor,
    pub estimator: ParameterEstimator,
    pub functor: MeasureFunctor,
    pub direction: EnhanceDirection,
    pub sigmas: Vec<f64>,
    pub scales: Vec<ScaleReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_min: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_max: Option<f32>,
    pub timings: TimingBreakdown,
}

impl EnhancementReport {
    /// One line per scale, for console output.
    pub fn summary_lines(&self) -> Vec<String> {
        self.scales
            .iter()
            .map(|s| {
                format!(
                    "scale {:>2} sigma={:.4} alpha={:.4} beta={:.4} scale={:.4} n={} range=[{}, {}] {:.1} ms",
                    s.index,
                    s.sigma,
                    s.parameters.alpha,
                    s.parameters.beta,
                    s.parameters.scale,
                    s.included_voxels,
                    format_optional(s.response_min),
                    format_optional(s.response_max),
                    s.timings.total_ms
                )
            })
            .collect()
    }
}

fn format_optional(val: Option<f32>) -> String {
    val.map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "-".to_string())
}
