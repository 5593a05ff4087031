//! Sampled Gaussian derivative kernels and separable axis correlation.
//!
//! Kernels are stored as correlation taps: `out[i] = Σ_k w[k] · in[i + k]`
//! for `k ∈ [-r, r]`. Each order is normalised on the discrete lattice so
//! that it reproduces the matching polynomial moment exactly:
//! - order 0: `Σ w = 1`
//! - order 1: `Σ w·k = 1`
//! - order 2: `Σ w = 0`, `Σ w·k² = 2`
//!
//! Borders replicate the nearest edge voxel.
use crate::error::{EnhanceError, Result};
use crate::slabs;
use crate::volume::{Volume, VolumeF32};

/// Lattice axis of a volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Widest kernel support evaluated when building taps.
pub const MAX_KERNEL_RADIUS: usize = 1 << 24;

/// Half-width used for a kernel of standard deviation `sigma_px` voxels.
pub fn kernel_radius(sigma_px: f64, truncate: f64) -> usize {
    // float-to-int casts saturate, so huge sigmas map to usize::MAX
    ((truncate * sigma_px).ceil() as usize).max(1)
}

/// Gaussian derivative taps of the given order (0, 1 or 2) in voxel units.
pub fn gaussian_kernel(sigma_px: f64, order: u8, truncate: f64) -> Result<Vec<f32>> {
    folded_gaussian_kernel(sigma_px, order, truncate, usize::MAX)
}

/// Taps for an axis of `axis_len` voxels.
///
/// Offsets beyond `axis_len - 1` always clamp onto the edge voxel under
/// replicate borders, so they are summed into the outermost tap. The result of
/// [`correlate_axis`] is unchanged while the tap count stays bounded by the
/// axis length.
pub fn axis_kernel(sigma_px: f64, order: u8, truncate: f64, axis_len: usize) -> Result<Vec<f32>> {
    folded_gaussian_kernel(sigma_px, order, truncate, axis_len.saturating_sub(1))
}

fn folded_gaussian_kernel(
    sigma_px: f64,
    order: u8,
    truncate: f64,
    max_radius: usize,
) -> Result<Vec<f32>> {
    if !sigma_px.is_finite() || sigma_px <= 0.0 {
        return Err(EnhanceError::invalid(format!(
            "kernel sigma must be finite and positive, got {sigma_px}"
        )));
    }
    if !truncate.is_finite() || truncate <= 0.0 {
        return Err(EnhanceError::invalid(format!(
            "kernel truncation must be finite and positive, got {truncate}"
        )));
    }
    if order > 2 {
        return Err(EnhanceError::invalid(format!(
            "unsupported derivative order {order}"
        )));
    }
    let full = kernel_radius(sigma_px, truncate);
    if full > MAX_KERNEL_RADIUS {
        return Err(EnhanceError::invalid(format!(
            "kernel for sigma {sigma_px} voxels exceeds {MAX_KERNEL_RADIUS} taps per side"
        )));
    }
    let r = full as isize;
    let folded = full.min(max_radius) as isize;
    let s2 = sigma_px * sigma_px;
    let gauss = |k: f64| (-k * k / (2.0 * s2)).exp();
    let second = |k: f64| (k * k / (s2 * s2) - 1.0 / s2) * gauss(k);

    // First pass: normalisation sums over the full support.
    let (mut sum_g, mut sum_k2g, mut sum_d2, mut sum_k2d2, mut sum_k2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for k in (-r..=r).map(|k| k as f64) {
        let g = gauss(k);
        let d2 = second(k);
        sum_g += g;
        sum_k2g += k * k * g;
        sum_d2 += d2;
        sum_k2d2 += k * k * d2;
        sum_k2 += k * k;
    }
    let mean_d2 = sum_d2 / (2 * r + 1) as f64;

    let mut taps = vec![0.0f64; (2 * folded + 1) as usize];
    let bin = |k: isize| (k.clamp(-folded, folded) + folded) as usize;
    match order {
        0 => {
            for k in -r..=r {
                taps[bin(k)] += gauss(k as f64) / sum_g;
            }
        }
        1 if sum_k2g.is_finite() && sum_k2g > f64::EPSILON => {
            for k in -r..=r {
                let kf = k as f64;
                taps[bin(k)] += kf * gauss(kf) / sum_k2g;
            }
        }
        1 => {
            // Gaussian underflows off-centre; use the σ → 0 limit.
            taps[bin(-1)] -= 0.5;
            taps[bin(1)] += 0.5;
        }
        _ => {
            // Zero-mean second derivative, then Σ w·k² = 2.
            let moment = sum_k2d2 - mean_d2 * sum_k2;
            if !moment.is_finite() || moment.abs() <= f64::EPSILON {
                return Err(EnhanceError::invalid(format!(
                    "second-derivative kernel degenerates at sigma {sigma_px}"
                )));
            }
            for k in -r..=r {
                taps[bin(k)] += 2.0 * (second(k as f64) - mean_d2) / moment;
            }
        }
    }
    if taps.iter().any(|w| !w.is_finite()) {
        return Err(EnhanceError::invalid(format!(
            "order-{order} kernel is not finite at sigma {sigma_px}"
        )));
    }
    Ok(taps.into_iter().map(|w| w as f32).collect())
}

/// Correlate `src` with `taps` along one axis, replicating border voxels.
pub fn correlate_axis(src: &VolumeF32, axis: Axis, taps: &[f32]) -> VolumeF32 {
    let geometry = *src.geometry();
    let [nx, ny, _] = geometry.dims;
    let n_axis = geometry.dims[axis.index()] as isize;
    let r = (taps.len() / 2) as isize;
    let mut out: VolumeF32 = Volume::new(geometry);

    slabs::for_each_slice_mut(out.data_mut(), geometry.slice_len(), |z, slice| {
        for y in 0..ny {
            for x in 0..nx {
                let pos = [x, y, z];
                let centre = pos[axis.index()] as isize;
                let mut acc = 0.0f32;
                for (j, w) in taps.iter().enumerate() {
                    let c = (centre + j as isize - r).clamp(0, n_axis - 1) as usize;
                    let v = match axis {
                        Axis::X => src.get(c, y, z),
                        Axis::Y => src.get(x, c, z),
                        Axis::Z => src.get(x, y, c),
                    };
                    acc += w * v;
                }
                slice[x + nx * y] = acc;
            }
        }
    });
    out
}

/// Separable Gaussian smoothing with per-axis physical `sigma`.
pub fn smooth(src: &VolumeF32, sigma: f64, truncate: f64) -> Result<VolumeF32> {
    let spacing = src.geometry().spacing;
    let mut current = src.clone();
    let dims = src.dims();
    for axis in Axis::ALL {
        let i = axis.index();
        let taps = axis_kernel(sigma / spacing[i], 0, truncate, dims[i])?;
        current = correlate_axis(&current, axis, &taps);
    }
    Ok(current)
}
