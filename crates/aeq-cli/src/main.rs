//! `aeq`: batch driver that walks an input directory for measurement
//! CSVs, runs each through the equalization pipeline, and writes
//! GraphicEQ / ParametricEQ / summary output — or, without `--output-dir`,
//! prints a dry-run summary per file.

mod cli;
mod run;

use clap::Parser;
use cli::Args;
use rayon::prelude::*;
use run::{load_curve, process_file};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_OK: u8 = 0;
const EXIT_FILE_FAILURE: u8 = 1;
const EXIT_INVALID_CONFIGURATION: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.to_pipeline_config();

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        return ExitCode::from(EXIT_INVALID_CONFIGURATION);
    }

    let calibration = match args.calibration.as_deref().map(load_curve) {
        Some(Ok(curve)) => Some(curve),
        Some(Err(e)) => {
            tracing::error!(error = %e, "failed to load calibration file");
            return ExitCode::from(EXIT_INVALID_CONFIGURATION);
        }
        None => None,
    };

    let compensation = match args.compensation.as_deref().map(load_curve) {
        Some(Ok(curve)) => Some(curve),
        Some(Err(e)) => {
            tracing::error!(error = %e, "failed to load compensation file");
            return ExitCode::from(EXIT_INVALID_CONFIGURATION);
        }
        None => None,
    };

    let paths = collect_csv_paths(&args.input_dir);
    tracing::info!(count = paths.len(), dir = %args.input_dir.display(), "discovered input files");

    let outcomes: Vec<Result<run::FileSummary, (String, String)>> = paths
        .par_iter()
        .map(|path| {
            process_file(
                path,
                &config,
                calibration.as_ref(),
                compensation.as_ref(),
                args.output_dir.as_deref(),
            )
            .map_err(|e| (path.display().to_string(), e.to_string()))
        })
        .collect();

    let mut failures = 0usize;
    for outcome in &outcomes {
        match outcome {
            Ok(summary) => {
                if args.output_dir.is_none() {
                    println!(
                        "{}: rmse={} filters={}",
                        summary.name,
                        summary.rmse.map(|r| format!("{r:.3}")).unwrap_or_else(|| "-".to_string()),
                        summary.filter_count
                    );
                }
            }
            Err((path, message)) => {
                failures += 1;
                tracing::error!(file = %path, error = %message, "measurement failed");
            }
        }
    }

    if failures > 0 {
        ExitCode::from(EXIT_FILE_FAILURE)
    } else {
        ExitCode::from(EXIT_OK)
    }
}

fn collect_csv_paths(root: &std::path::Path) -> Vec<std::path::PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().map(|e| e == "csv").unwrap_or(false))
        .map(|entry| entry.into_path())
        .collect()
}
