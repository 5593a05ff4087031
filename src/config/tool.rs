use crate::enhancer::{EnhanceParams, EnhancementMethod};
use crate::error::{EnhanceError, Result};
use crate::hessian::HessianOptions;
use crate::mask::{BoxMask, Mask, SphereMask};
use crate::measure::{EnhanceDirection, ParameterEstimator};
use crate::preprocess::PreprocessOptions;
use crate::sigma::{SigmaSchedule, SigmaStepMethod};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct EnhanceToolConfig {
    pub input: InputConfig,
    pub sigma: SigmaConfig,
    #[serde(default)]
    pub method: EnhancementMethod,
    #[serde(default)]
    pub direction: EnhanceDirection,
    /// Overrides the estimator implied by `method`.
    #[serde(default)]
    pub estimator: Option<ParameterEstimator>,
    #[serde(default)]
    pub hessian: HessianOptions,
    #[serde(default)]
    pub preprocess: Option<PreprocessConfig>,
    #[serde(default)]
    pub mask: Option<MaskConfig>,
    pub output: OutputConfig,
}

impl EnhanceToolConfig {
    pub fn enhance_params(&self) -> EnhanceParams {
        let params = EnhanceParams::for_method(self.method)
            .with_direction(self.direction)
            .with_hessian(self.hessian);
        match self.estimator {
            Some(estimator) => params.with_estimator(estimator),
            None => params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// Directory of PNG slices, sorted by file name along z.
    pub slices_dir: PathBuf,
    #[serde(default = "unit_spacing")]
    pub spacing: [f64; 3],
    #[serde(default)]
    pub origin: [f64; 3],
}

fn unit_spacing() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// Either an explicit list of scales or a generated range.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SigmaConfig {
    List {
        values: Vec<f64>,
    },
    Range {
        min: f64,
        max: f64,
        steps: usize,
        #[serde(default)]
        method: SigmaStepMethod,
    },
}

impl SigmaConfig {
    pub fn to_schedule(&self) -> Result<SigmaSchedule> {
        match self {
            SigmaConfig::List { values } => SigmaSchedule::from_values(values.clone()),
            SigmaConfig::Range {
                min,
                max,
                steps,
                method,
            } => SigmaSchedule::generate(*min, *max, *steps, *method),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub enabled: bool,
    pub sigma: f64,
    pub scaling: f64,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        let defaults = PreprocessOptions::default();
        Self {
            enabled: true,
            sigma: defaults.sigma,
            scaling: defaults.scaling,
        }
    }
}

impl PreprocessConfig {
    /// Options to apply, or `None` when preprocessing is disabled.
    pub fn to_options(&self) -> Option<PreprocessOptions> {
        self.enabled.then(|| {
            PreprocessOptions::default()
                .with_sigma(self.sigma)
                .with_scaling(self.scaling)
        })
    }
}

/// Physical-space region restricting estimation and output.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaskConfig {
    Box { min: [f64; 3], max: [f64; 3] },
    Sphere { center: [f64; 3], radius: f64 },
}

impl MaskConfig {
    pub fn build(&self) -> Box<dyn Mask> {
        match *self {
            MaskConfig::Box { min, max } => Box::new(BoxMask::new(min, max)),
            MaskConfig::Sphere { center, radius } => Box::new(SphereMask::new(center, radius)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub slices_dir: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    pub report_json: PathBuf,
    /// Also write each per-scale response as its own slice stack.
    #[serde(default)]
    pub per_scale_dir: Option<PathBuf>,
    /// Write the preprocessed input volume as a slice stack.
    #[serde(default)]
    pub preprocessed_dir: Option<PathBuf>,
}

fn default_prefix() -> String {
    "sheetness".to_string()
}

pub fn load_config(path: &Path) -> Result<EnhanceToolConfig> {
    let data = fs::read_to_string(path)
        .map_err(|e| EnhanceError::io(path, format!("failed to read config: {e}")))?;
    serde_json::from_str(&data).map_err(|e| EnhanceError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
