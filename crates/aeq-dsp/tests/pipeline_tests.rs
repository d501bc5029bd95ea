//! End-to-end exercise of the Coordinator path on synthetic data:
//! interpolate → center → compensate → smoothen → equalize → optimize.

use aeq_dsp::{Coordinator, InputCurve, PipelineConfig};

fn synthetic_raw() -> (Vec<f64>, Vec<f64>) {
    let freq = vec![20.0, 60.0, 120.0, 500.0, 1000.0, 3000.0, 8000.0, 20000.0];
    let amp = vec![-2.0, 0.0, 4.0, 1.0, 0.0, -3.0, -4.0, -6.0];
    (freq, amp)
}

#[test]
fn full_pipeline_runs_without_compensation_when_equalize_disabled() {
    let config = PipelineConfig::default();
    let coordinator = Coordinator::new(&config);
    let (freq, amp) = synthetic_raw();

    let output = coordinator
        .process(InputCurve { freq: &freq, amplitude: &amp }, None, None)
        .expect("pipeline should succeed without equalize");

    assert!(output.buffer.raw.is_some());
    assert!(output.buffer.smoothed.is_some());
    assert!(output.buffer.target.is_none());
    assert!(output.buffer.equalization.is_none());
    output.buffer.assert_aligned(output.freqs.len());
}

#[test]
fn full_pipeline_with_calibration_and_compensation() {
    let mut config = PipelineConfig::default();
    config.equalize = true;
    config.parametric_eq = true;
    config.max_filters = Some(6);
    config.bass_boost_db = 4.0;
    config.tilt_db_per_octave = 0.5;

    let coordinator = Coordinator::new(&config);
    let (freq, amp) = synthetic_raw();
    let calibration_amp = vec![0.5; freq.len()];
    let compensation_amp = vec![0.0; freq.len()];

    let output = coordinator
        .process(
            InputCurve { freq: &freq, amplitude: &amp },
            Some(InputCurve { freq: &freq, amplitude: &calibration_amp }),
            Some(InputCurve { freq: &freq, amplitude: &compensation_amp }),
        )
        .expect("full pipeline should succeed");

    output.buffer.assert_aligned(output.freqs.len());
    assert!(output.buffer.target.is_some());
    assert!(output.buffer.error.is_some());
    assert!(output.buffer.equalization.is_some());
    assert!(output.buffer.parametric_eq.is_some());

    let report = output.optimization.expect("optimization should have run");
    assert!(report.filters.len() <= 6);
    for f in &report.filters {
        assert!(f.q > 0.0);
        assert!(f.gain_db.abs() > 0.1);
    }
}

#[test]
fn parametric_eq_without_equalize_is_rejected_before_any_work() {
    let mut config = PipelineConfig::default();
    config.parametric_eq = true;
    config.equalize = false;
    assert!(config.validate().is_err());
}
