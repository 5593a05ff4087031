//! I/O helpers for volumes stored as PNG slice stacks, plus JSON reports.
//!
//! - `load_png_stack`: read every `*.png` in a directory (sorted by file name)
//!   as consecutive z-slices of a volume. Samples are read as 16-bit luma and
//!   stored as raw `f32` values.
//! - `save_slices_png`: write each z-slice of an `f32` volume to an 8-bit PNG,
//!   linearly mapping the volume's finite min..max onto 0..255.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{Volume, VolumeF32, VolumeGeometry};
use crate::error::{EnhanceError, Result};
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Load a directory of equally sized grayscale PNG slices as a volume.
pub fn load_png_stack(dir: &Path, spacing: [f64; 3], origin: [f64; 3]) -> Result<VolumeF32> {
    let slices = list_png_files(dir)?;
    if slices.is_empty() {
        return Err(EnhanceError::io(dir, "directory contains no .png slices"));
    }

    let mut dims = [0usize, 0usize, slices.len()];
    let mut data = Vec::new();
    for (z, path) in slices.iter().enumerate() {
        let img = image::open(path)
            .map_err(|e| EnhanceError::io(path, format!("failed to open: {e}")))?
            .into_luma16();
        let (w, h) = (img.width() as usize, img.height() as usize);
        if z == 0 {
            dims[0] = w;
            dims[1] = h;
            data.reserve(w * h * slices.len());
        } else if (w, h) != (dims[0], dims[1]) {
            return Err(EnhanceError::io(
                path,
                format!("slice is {w}x{h}, expected {}x{}", dims[0], dims[1]),
            ));
        }
        data.extend(img.into_raw().into_iter().map(f32::from));
    }

    let geometry = VolumeGeometry::new(dims)
        .with_spacing(spacing)
        .with_origin(origin);
    geometry.validate()?;
    Volume::from_vec(geometry, data)
}

/// Save every z-slice as `<dir>/<prefix>_<z>.png`, returning the written paths.
pub fn save_slices_png(volume: &VolumeF32, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| EnhanceError::io(dir, format!("failed to create: {e}")))?;
    let [nx, ny, nz] = volume.dims();
    let (lo, hi) = volume.min_max().unwrap_or((0.0, 0.0));
    let range = hi - lo;
    let width = nz.max(1).to_string().len();

    let mut written = Vec::with_capacity(nz);
    for z in 0..nz {
        let mut out = GrayImage::new(nx as u32, ny as u32);
        let slice = volume.slice(z);
        for y in 0..ny {
            for x in 0..nx {
                let v = slice[x + nx * y];
                let scaled = if range > 0.0 && v.is_finite() {
                    ((v - lo) / range * 255.0).clamp(0.0, 255.0)
                } else {
                    0.0
                };
                out.put_pixel(x as u32, y as u32, Luma([scaled as u8]));
            }
        }
        let path = dir.join(format!("{prefix}_{z:0width$}.png"));
        out.save(&path)
            .map_err(|e| EnhanceError::io(&path, format!("failed to save: {e}")))?;
        written.push(path);
    }
    Ok(written)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| EnhanceError::io(path, format!("failed to serialize JSON: {e}")))?;
    fs::write(path, json).map_err(|e| EnhanceError::io(path, format!("failed to write JSON: {e}")))
}

fn list_png_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).map_err(|e| EnhanceError::io(dir, format!("failed to list: {e}")))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| EnhanceError::io(dir, e))?.path();
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| EnhanceError::io(parent, format!("failed to create: {e}")))?;
        }
    }
    Ok(())
}
