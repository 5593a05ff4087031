//! Cross-scale fusion of per-scale responses.
//!
//! The fold keeps, per voxel, the response of largest magnitude with its sign
//! preserved. On equal magnitudes the value already accumulated wins, so the
//! earliest scale is kept.
use crate::error::{EnhanceError, Result};
use crate::slabs;
use crate::volume::VolumeF32;

/// `a` when `|a| ≥ |b|`, otherwise `b`.
#[inline]
pub fn max_abs(a: f32, b: f32) -> f32 {
    if a.abs() >= b.abs() {
        a
    } else {
        b
    }
}

/// In-place `out[i] = max_abs(out[i], response[i])`.
pub fn combine_max_abs(out: &mut VolumeF32, response: &VolumeF32) -> Result<()> {
    if !out.same_lattice(response) {
        return Err(EnhanceError::invalid(format!(
            "response lattice {} differs from output {}",
            response.geometry(),
            out.geometry()
        )));
    }
    let slice_len = out.geometry().slice_len();
    slabs::for_each_slice_mut(out.data_mut(), slice_len, |z, slice| {
        for (dst, src) in slice.iter_mut().zip(response.slice(z)) {
            *dst = max_abs(*dst, *src);
        }
    });
    Ok(())
}

/// Accumulates per-scale responses into the output field.
#[derive(Debug, Default)]
pub struct ScaleCombiner {
    output: Option<VolumeF32>,
    folded: usize,
}

impl ScaleCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with the first response, fold every later one.
    pub fn push(&mut self, response: VolumeF32) -> Result<()> {
        match self.output.as_mut() {
            None => self.output = Some(response),
            Some(out) => combine_max_abs(out, &response)?,
        }
        self.folded += 1;
        Ok(())
    }

    /// Number of responses folded so far.
    pub fn len(&self) -> usize {
        self.folded
    }

    pub fn is_empty(&self) -> bool {
        self.folded == 0
    }

    pub fn output(&self) -> Option<&VolumeF32> {
        self.output.as_ref()
    }

    /// Hand out the fused field; `None` when nothing was pushed.
    pub fn finish(self) -> Option<VolumeF32> {
        self.output
    }
}
