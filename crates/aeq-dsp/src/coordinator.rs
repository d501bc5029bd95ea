//! Orchestrates one measurement end to end: interpolate → (calibrate?) →
//! center → (compensate?) → smoothen → (equalize → (optimize)?), per
//! spec.md §4.9.

use crate::compensator::{calibrate, Compensator};
use crate::config::PipelineConfig;
use crate::gain_curve::{GainCurveBuilder, GainCurveParams};
use crate::optimizer::{BiquadOptimizer, OptimizationReport};
use crate::peak_init::PeakInitializer;
use crate::smoother::{BandParams, Smoother};
use aeq_core::{generate_grid, interpolate, AeqError, AeqResult, ResponseBuffer};

/// A raw curve as read from input/calibration/compensation CSVs, before
/// resampling onto the canonical grid.
pub struct InputCurve<'a> {
    pub freq: &'a [f64],
    pub amplitude: &'a [f64],
}

pub struct CoordinatorOutput {
    pub freqs: Vec<f64>,
    pub buffer: ResponseBuffer,
    pub optimization: Option<OptimizationReport>,
}

pub struct Coordinator<'a> {
    pub config: &'a PipelineConfig,
}

impl<'a> Coordinator<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    pub fn process(
        &self,
        raw: InputCurve,
        calibration: Option<InputCurve>,
        compensation: Option<InputCurve>,
    ) -> AeqResult<CoordinatorOutput> {
        if raw.freq.is_empty() {
            return Err(AeqError::DataMissing("input measurement is empty".to_string()));
        }

        let freqs = generate_grid(self.config.f_min, self.config.f_max, self.config.step);
        let mut buffer = ResponseBuffer::new();

        let mut raw_values = interpolate(raw.freq, raw.amplitude, &freqs, 1);

        if let Some(cal) = calibration {
            let cal_values = interpolate(cal.freq, cal.amplitude, &freqs, 1);
            raw_values = calibrate(&raw_values, &cal_values);
        }
        buffer.set_raw(raw_values);

        let shift = interpolate(&freqs, buffer.raw.as_ref().unwrap(), &[1000.0], 1)[0];
        buffer.center_in_place(shift);

        let comp = Compensator::new(
            self.config.bass_boost_db,
            self.config.tilt_db_per_octave,
            self.config.f_min,
            self.config.f_max,
        );

        if let Some(compensation) = compensation {
            let compensation_values = interpolate(compensation.freq, compensation.amplitude, &freqs, 1);
            let compensation_smoothed = comp.prepare_compensation(&freqs, &compensation_values);
            let (target, error) = comp.target_and_error(
                &freqs,
                buffer.raw.as_ref().unwrap(),
                &compensation_smoothed,
            );
            buffer.set_target_and_error(target, error);
        }

        let smoother = Smoother::new(
            BandParams {
                window_octaves: self.config.smoothing_window_octaves,
                iterations: self.config.smoothing_iterations,
            },
            BandParams {
                window_octaves: self.config.treble_smoothing_window_octaves,
                iterations: self.config.treble_smoothing_iterations,
            },
            self.config.treble_f_lower,
            self.config.treble_f_upper,
        );

        let smoothed = smoother.smoothen(&freqs, buffer.raw.as_ref().unwrap())?;
        let error_smoothed = match &buffer.error {
            Some(error) => Some(smoother.smoothen(&freqs, error)?),
            None => None,
        };
        buffer.set_smoothed(smoothed, error_smoothed);

        let mut optimization = None;

        if self.config.equalize {
            let error_for_gain = buffer
                .error_smoothed
                .as_ref()
                .or(buffer.error.as_ref())
                .ok_or_else(|| {
                    AeqError::MissingPrerequisite(
                        "equalize called with no error channel".to_string(),
                    )
                })?;

            let builder = GainCurveBuilder::new(GainCurveParams {
                max_gain_db: self.config.max_gain_db,
                treble_max_gain_db: self.config.treble_max_gain_db,
                treble_gain_k: self.config.treble_gain_k,
                treble_f_lower: self.config.treble_f_lower,
                treble_f_upper: self.config.treble_f_upper,
                smooth_kinks: true,
            });

            let result = builder.equalize(
                &freqs,
                error_for_gain,
                buffer.raw.as_ref().unwrap(),
                buffer.smoothed.as_deref(),
            );
            buffer.set_equalization(
                result.equalization,
                result.equalized_raw,
                result.equalized_smoothed,
            );

            if self.config.parametric_eq {
                let equalization = buffer.equalization.as_ref().ok_or_else(|| {
                    AeqError::MissingPrerequisite(
                        "optimize_parametric_eq called with no equalization channel".to_string(),
                    )
                })?;

                let initializer = PeakInitializer::new(self.config.max_filters);
                let seeds = initializer.initialize(&freqs, equalization);
                let report = BiquadOptimizer::optimize(&freqs, equalization, &seeds);
                buffer.set_parametric_eq(report.parametric_eq.clone());
                if !report.converged {
                    tracing::warn!(rmse = report.rmse, "optimizer did not reach target loss");
                }
                optimization = Some(report);
            }
        }

        buffer.assert_aligned(freqs.len());
        Ok(CoordinatorOutput { freqs, buffer, optimization })
    }
}
