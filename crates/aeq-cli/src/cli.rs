//! `clap`-derived argument parsing for the `aeq` batch driver.

use aeq_dsp::PipelineConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "aeq", about = "Headphone frequency-response equalizer fitter")]
pub struct Args {
    /// Directory to recursively walk for measurement CSVs.
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Directory to write results into. When omitted, a dry-run summary
    /// is printed to stdout and no files are written.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Calibration measurement CSV, subtracted from every input's raw
    /// response before compensation.
    #[arg(long)]
    pub calibration: Option<PathBuf>,

    /// Compensation (target headphone) measurement CSV.
    #[arg(long)]
    pub compensation: Option<PathBuf>,

    /// Derive the equalization curve.
    #[arg(long)]
    pub equalize: bool,

    /// Fit a parametric EQ to the equalization curve (requires --equalize).
    #[arg(long)]
    pub parametric_eq: bool,

    /// Maximum number of parametric filters to emit.
    #[arg(long)]
    pub max_filters: Option<usize>,

    #[arg(long, default_value_t = 0.0)]
    pub bass_boost: f64,

    #[arg(long, default_value_t = 0.0)]
    pub tilt: f64,

    #[arg(long, default_value_t = 6.0)]
    pub max_gain: f64,

    #[arg(long, default_value_t = 6000.0)]
    pub treble_f_lower: f64,

    #[arg(long, default_value_t = 8000.0)]
    pub treble_f_upper: f64,

    #[arg(long, default_value_t = 0.0)]
    pub treble_max_gain: f64,

    #[arg(long, default_value_t = 1.0)]
    pub treble_gain_k: f64,
}

impl Args {
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.equalize = self.equalize;
        config.parametric_eq = self.parametric_eq;
        config.max_filters = self.max_filters;
        config.bass_boost_db = self.bass_boost;
        config.tilt_db_per_octave = self.tilt;
        config.max_gain_db = self.max_gain;
        config.treble_f_lower = self.treble_f_lower;
        config.treble_f_upper = self.treble_f_upper;
        config.treble_max_gain_db = self.treble_max_gain;
        config.treble_gain_k = self.treble_gain_k;
        config
    }
}
