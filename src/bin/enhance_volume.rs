use serde::Serialize;
use sheet_enhance::config::{self, EnhanceToolConfig};
use sheet_enhance::diagnostics::{elapsed_ms, EnhancementReport, TimingBreakdown};
use sheet_enhance::preprocess::unsharp_enhance;
use sheet_enhance::volume::io::{load_png_stack, save_slices_png, write_json_file};
use sheet_enhance::{MultiScaleEnhancer, ScaleProgress};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = config::load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;
    let mut timings = TimingBreakdown::default();
    let total_start = Instant::now();

    let t = Instant::now();
    let mut volume = load_png_stack(
        &config.input.slices_dir,
        config.input.spacing,
        config.input.origin,
    )
    .map_err(|e| e.to_string())?;
    timings.push("load", elapsed_ms(t));
    println!(
        "Loaded volume {:?} from {}",
        volume.dims(),
        config.input.slices_dir.display()
    );

    let mut preprocessed_slices = 0;
    if let Some(pre) = config.preprocess.as_ref().and_then(|p| p.to_options()) {
        let t = Instant::now();
        volume = unsharp_enhance(&volume, &pre).map_err(|e| e.to_string())?;
        timings.push("preprocess", elapsed_ms(t));
        if let Some(dir) = config.output.preprocessed_dir.as_ref() {
            let prefix = format!("{}_preprocessed", config.output.prefix);
            preprocessed_slices = save_slices_png(&volume, dir, &prefix)
                .map_err(|e| e.to_string())?
                .len();
            println!("Saved {preprocessed_slices} preprocessed slices to {}", dir.display());
        }
    }

    let sigmas = config.sigma.to_schedule().map_err(|e| e.to_string())?;
    let mask = config.mask.as_ref().map(|m| m.build());
    let params = config
        .enhance_params()
        .with_keep_scale_responses(config.output.per_scale_dir.is_some());
    let enhancer = MultiScaleEnhancer::new(params);

    let t = Instant::now();
    let stage = sheet_enhance::GaussianHessianEigen::new(config.hessian);
    let result = enhancer
        .run_with_progress(&stage, &volume, &sigmas, mask.as_deref(), print_progress)
        .map_err(|e| e.to_string())?;
    timings.push("enhance", elapsed_ms(t));

    let t = Instant::now();
    let written = save_slices_png(&result.output, &config.output.slices_dir, &config.output.prefix)
        .map_err(|e| e.to_string())?;
    let per_scale = save_per_scale(&config, &result.scale_responses)?;
    timings.push("save", elapsed_ms(t));
    timings.total_ms = elapsed_ms(total_start);

    for line in result.report.summary_lines() {
        println!("{line}");
    }
    let summary = EnhanceToolReport {
        config_path: PathBuf::from(&config_path),
        output_slices: written.len(),
        per_scale_slices: per_scale,
        preprocessed_slices,
        enhancement: result.report,
        timings,
    };
    write_json_file(&config.output.report_json, &summary).map_err(|e| e.to_string())?;

    println!(
        "Saved {} slices to {}",
        written.len(),
        config.output.slices_dir.display()
    );
    println!("Saved report to {}", config.output.report_json.display());
    Ok(())
}

fn print_progress(p: &ScaleProgress) {
    println!(
        "[{}/{}] sigma={:.4} done in {:.1} ms",
        p.index + 1,
        p.total,
        p.sigma,
        p.elapsed_ms
    );
}

fn save_per_scale(
    config: &EnhanceToolConfig,
    responses: &[sheet_enhance::VolumeF32],
) -> Result<usize, String> {
    let Some(dir) = config.output.per_scale_dir.as_ref() else {
        return Ok(0);
    };
    let mut count = 0;
    for (i, response) in responses.iter().enumerate() {
        let prefix = format!("{}_scale{i}", config.output.prefix);
        count += save_slices_png(response, dir, &prefix)
            .map_err(|e| e.to_string())?
            .len();
    }
    Ok(count)
}

fn usage() -> String {
    "Usage: enhance_volume <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceToolReport {
    config_path: PathBuf,
    output_slices: usize,
    per_scale_slices: usize,
    preprocessed_slices: usize,
    enhancement: EnhancementReport,
    timings: TimingBreakdown,
}
