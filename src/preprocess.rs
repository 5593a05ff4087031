//! Unsharp-mask sharpening applied before enhancement.
//!
//! `I' = I + k · (I − G_σ * I)`. Flat regions are unchanged; edges and thin
//! structures gain contrast, which helps the sheet-tube-noise measure separate
//! adjacent sheets.
use crate::error::{EnhanceError, Result};
use crate::hessian::gaussian::smooth;
use crate::volume::VolumeF32;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PreprocessOptions {
    /// Blur scale in physical units.
    pub sigma: f64,
    /// Weight `k` of the high-pass residual.
    pub scaling: f64,
    /// Kernel half-width in standard deviations.
    pub truncate: f64,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            scaling: 10.0,
            truncate: 4.0,
        }
    }
}

impl PreprocessOptions {
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_scaling(mut self, scaling: f64) -> Self {
        self.scaling = scaling;
        self
    }
}

pub fn unsharp_enhance(volume: &VolumeF32, options: &PreprocessOptions) -> Result<VolumeF32> {
    if !options.scaling.is_finite() {
        return Err(EnhanceError::invalid(format!(
            "unsharp scaling must be finite, got {}",
            options.scaling
        )));
    }
    volume.geometry().validate()?;
    let blurred = smooth(volume, options.sigma, options.truncate)?;
    let k = options.scaling as f32;
    let mut out = volume.clone();
    for (dst, b) in out.data_mut().iter_mut().zip(blurred.data()) {
        *dst += k * (*dst - b);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::{Volume, VolumeGeometry};

    #[test]
    fn constant_volume_is_unchanged() {
        let v = Volume::filled(VolumeGeometry::new([6, 5, 4]), 42.0f32);
        let out = unsharp_enhance(&v, &PreprocessOptions::default()).unwrap();
        assert!(out.data().iter().all(|x| (x - 42.0).abs() < 1e-2));
    }

    #[test]
    fn isolated_peak_is_amplified() {
        let g = VolumeGeometry::new([9, 9, 9]);
        let v = Volume::from_fn(g, |x, y, z| if (x, y, z) == (4, 4, 4) { 1.0 } else { 0.0 });
        let out = unsharp_enhance(&v, &PreprocessOptions::default().with_scaling(2.0)).unwrap();
        assert!(out.get(4, 4, 4) > 1.0);
        assert!(out.get(5, 4, 4) < 0.0);
    }

    #[test]
    fn rejects_bad_sigma() {
        let v = Volume::filled(VolumeGeometry::new([2, 2, 2]), 1.0f32);
        assert!(unsharp_enhance(&v, &PreprocessOptions::default().with_sigma(0.0)).is_err());
    }
}
