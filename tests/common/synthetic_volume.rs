use sheet_enhance::hessian::{EigenAnalysis, EigenvalueField, Eigenvalues};
use sheet_enhance::volume::{Volume, VolumeF32, VolumeGeometry};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Bright plate `z ∈ [z0, z1]` on a dark background with a weak quadratic
/// bowl in x and y, so the in-plane eigenvalues are small but non-zero.
pub fn plate_volume(dims: [usize; 3], z0: usize, z1: usize, foreground: f32) -> VolumeF32 {
    assert!(z0 <= z1 && z1 < dims[2], "plate must lie inside the volume");
    let cx = (dims[0] as f32 - 1.0) * 0.5;
    let cy = (dims[1] as f32 - 1.0) * 0.5;
    Volume::from_fn(VolumeGeometry::new(dims), |x, y, z| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let bowl = 0.01 * dx * dx + 0.02 * dy * dy;
        let plate = if (z0..=z1).contains(&z) { foreground } else { 0.0 };
        10.0 + plate + bowl
    })
}

/// Eigen stage returning a fixed field multiplied by the scale, counting calls.
pub struct ScaledFieldStage {
    pub field: EigenvalueField,
    pub calls: AtomicUsize,
}

impl ScaledFieldStage {
    pub fn new(field: EigenvalueField) -> Self {
        Self {
            field,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn field_at(&self, sigma: f64) -> EigenvalueField {
        self.field.map(|e| {
            let v = e.values().map(|l| l * sigma as f32);
            Eigenvalues::from_unordered(v)
        })
    }
}

impl EigenAnalysis for ScaledFieldStage {
    fn eigenvalues(&self, _volume: &VolumeF32, sigma: f64) -> sheet_enhance::Result<EigenvalueField> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.field_at(sigma))
    }
}

/// Field whose eigenvalues vary smoothly with position: mostly sheet-like
/// voxels of both polarities plus a few tube- and blob-like ones.
pub fn mixed_field(geometry: VolumeGeometry) -> EigenvalueField {
    Volume::from_fn(geometry, |x, y, z| {
        let t = (x + 3 * y + 7 * z) as f32;
        let l3 = if (x + y + z) % 2 == 0 { -(1.0 + 0.1 * t) } else { 0.5 + 0.05 * t };
        let l2 = 0.05 * (1 + x % 3) as f32 * l3.abs();
        let l1 = if z % 4 == 0 { l2 } else { 0.01 * (y % 5) as f32 };
        Eigenvalues::from_unordered([l1, l2, l3])
    })
}
