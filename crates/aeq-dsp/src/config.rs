//! Every numeric knob the CLI surface exposes, bundled as a plain struct
//! rather than a teacher-style atomic parameter bank — this is an offline
//! batch tool, not a realtime processor, so there is nothing to update
//! from an audio thread.

use aeq_core::{AeqError, AeqResult, DEFAULT_F_MAX, DEFAULT_F_MIN, DEFAULT_STEP};

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub bass_boost_db: f64,
    pub tilt_db_per_octave: f64,
    pub max_gain_db: f64,
    pub treble_f_lower: f64,
    pub treble_f_upper: f64,
    pub treble_max_gain_db: f64,
    pub treble_gain_k: f64,
    pub max_filters: Option<usize>,

    pub f_min: f64,
    pub f_max: f64,
    pub step: f64,

    pub smoothing_window_octaves: f64,
    pub smoothing_iterations: usize,
    pub treble_smoothing_window_octaves: f64,
    pub treble_smoothing_iterations: usize,

    pub equalize: bool,
    pub parametric_eq: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bass_boost_db: 0.0,
            tilt_db_per_octave: 0.0,
            max_gain_db: 6.0,
            treble_f_lower: 6000.0,
            treble_f_upper: 8000.0,
            treble_max_gain_db: 0.0,
            treble_gain_k: 1.0,
            max_filters: None,

            f_min: DEFAULT_F_MIN,
            f_max: DEFAULT_F_MAX,
            step: DEFAULT_STEP,

            smoothing_window_octaves: 1.0 / 7.0,
            smoothing_iterations: 10,
            treble_smoothing_window_octaves: 1.0 / 5.0,
            treble_smoothing_iterations: 100,

            equalize: false,
            parametric_eq: false,
        }
    }
}

impl PipelineConfig {
    /// Validates configuration that must be checked once, before any file
    /// is processed, per spec.md §6's exit-code contract.
    pub fn validate(&self) -> AeqResult<()> {
        if self.treble_f_upper <= self.treble_f_lower {
            return Err(AeqError::InvalidConfiguration(format!(
                "treble_f_upper ({}) must exceed treble_f_lower ({})",
                self.treble_f_upper, self.treble_f_lower
            )));
        }
        if self.parametric_eq && !self.equalize {
            return Err(AeqError::InvalidConfiguration(
                "parametric_eq requires equalize".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_treble_band_is_rejected() {
        let mut cfg = PipelineConfig::default();
        cfg.treble_f_lower = 9000.0;
        cfg.treble_f_upper = 8000.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parametric_eq_without_equalize_is_rejected() {
        let mut cfg = PipelineConfig::default();
        cfg.parametric_eq = true;
        cfg.equalize = false;
        assert!(cfg.validate().is_err());
    }
}
