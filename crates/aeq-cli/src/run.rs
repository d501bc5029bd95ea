//! Per-file orchestration: read a measurement CSV, run it through the
//! `Coordinator`, and either print a dry-run summary or write results.

use aeq_core::AeqError;
use aeq_dsp::{Coordinator, InputCurve, PipelineConfig};
use aeq_io::FilterSpec;
use std::path::{Path, PathBuf};

pub struct LoadedCurve {
    pub freq: Vec<f64>,
    pub amplitude: Vec<f64>,
}

pub fn load_curve(path: &Path) -> Result<LoadedCurve, AeqError> {
    let (freq, buffer) = aeq_io::read_response_csv(path)?;
    let amplitude = buffer
        .raw
        .ok_or_else(|| AeqError::DataMissing(format!("{} has no raw column", path.display())))?;
    Ok(LoadedCurve { freq, amplitude })
}

pub struct FileSummary {
    pub name: String,
    pub rmse: Option<f64>,
    pub filter_count: usize,
}

/// Processes one measurement file end to end. `output_dir` is `None` for
/// a dry run (summary only, nothing written).
pub fn process_file(
    path: &Path,
    config: &PipelineConfig,
    calibration: Option<&LoadedCurve>,
    compensation: Option<&LoadedCurve>,
    output_dir: Option<&Path>,
) -> Result<FileSummary, AeqError> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(file = %path.display(), "processing measurement");

    let input = load_curve(path)?;
    let coordinator = Coordinator::new(config);

    let output = coordinator.process(
        InputCurve { freq: &input.freq, amplitude: &input.amplitude },
        calibration.map(|c| InputCurve { freq: &c.freq, amplitude: &c.amplitude }),
        compensation.map(|c| InputCurve { freq: &c.freq, amplitude: &c.amplitude }),
    )?;

    let rmse = output.optimization.as_ref().map(|r| r.rmse);
    let filter_count = output.optimization.as_ref().map(|r| r.filters.len()).unwrap_or(0);

    if let Some(dir) = output_dir {
        write_outputs(dir, &name, &output, config)?;
    }

    Ok(FileSummary { name, rmse, filter_count })
}

fn write_outputs(
    dir: &Path,
    name: &str,
    output: &aeq_dsp::CoordinatorOutput,
    config: &PipelineConfig,
) -> Result<(), AeqError> {
    std::fs::create_dir_all(dir).map_err(AeqError::Io)?;

    let csv_path: PathBuf = dir.join(format!("{name}.csv"));
    aeq_io::write_response_csv(&csv_path, &output.freqs, &output.buffer)?;

    if config.equalize {
        if let Some(equalization) = &output.buffer.equalization {
            let graphic_path = dir.join(format!("{name}_GraphicEQ.txt"));
            aeq_io::write_graphic_eq(&graphic_path, &output.freqs, equalization)?;
        }
    }

    if let Some(report) = &output.optimization {
        let filters: Vec<FilterSpec> = report
            .filters
            .iter()
            .map(|f| FilterSpec { fc: f.fc, q: f.q, gain_db: f.gain_db })
            .collect();

        let parametric_path = dir.join(format!("{name}_ParametricEQ.txt"));
        aeq_io::write_parametric_eq(&parametric_path, &filters)?;

        let summary_path = dir.join(format!("{name}.md"));
        aeq_io::write_summary_markdown(&summary_path, name, &filters)?;
    }

    Ok(())
}
