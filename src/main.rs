use sheet_enhance::volume::{Volume, VolumeGeometry};
use sheet_enhance::{EnhanceParams, EnhancementMethod, MultiScaleEnhancer, SigmaSchedule};

fn main() {
    // Demo: a bright plate three voxels thick on a dark background, enhanced
    // with both methods over a small logarithmic schedule.
    let geometry = VolumeGeometry::new([32, 32, 24]).with_spacing([1.0, 1.0, 1.5]);
    let volume = Volume::from_fn(geometry, |_, _, z| {
        if (11..=13).contains(&z) {
            200.0
        } else {
            10.0
        }
    });
    let sigmas = match SigmaSchedule::logarithmic(1.0, 3.0, 3) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    for method in [EnhancementMethod::SheetBlobNoise, EnhancementMethod::SheetTubeNoise] {
        let enhancer = MultiScaleEnhancer::new(EnhanceParams::for_method(method));
        match enhancer.run(&volume, &sigmas, None) {
            Ok(result) => {
                println!(
                    "{method:?}: centre={:.4} background={:.4} latency_ms={:.3}",
                    result.output.get(16, 16, 12),
                    result.output.get(16, 16, 2),
                    result.report.timings.total_ms
                );
            }
            Err(err) => eprintln!("{method:?}: {err}"),
        }
    }
}
