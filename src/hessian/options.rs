use serde::{Deserialize, Serialize};

/// Options controlling the Gaussian-derivative Hessian stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HessianOptions {
    /// Kernel half-width in standard deviations (per axis, in voxels).
    pub truncate: f64,
    /// Multiply second derivatives by σ² so responses compare across scales.
    pub normalize_across_scale: bool,
}

impl Default for HessianOptions {
    fn default() -> Self {
        Self {
            truncate: 4.0,
            normalize_across_scale: true,
        }
    }
}

impl HessianOptions {
    pub fn with_truncate(mut self, truncate: f64) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn with_normalize_across_scale(mut self, normalize: bool) -> Self {
        self.normalize_across_scale = normalize;
        self
    }
}
