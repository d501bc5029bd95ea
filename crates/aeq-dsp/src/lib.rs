//! aeq-dsp: the signal-processing and optimization engine — smoothing,
//! compensation, gain-curve derivation, peak initialization, and the
//! biquad optimizer, strung together by the `Coordinator`.

mod biquad;
mod compensator;
mod config;
mod coordinator;
mod gain_curve;
mod optimizer;
mod peak_init;
mod savgol;
mod smoother;

pub use biquad::{cascade_magnitude_db, cascade_response, magnitude_db, BiquadCoeffs, PeakingFilter};
pub use compensator::{bass_boost_curve, calibrate, center, tilt_curve, Compensator};
pub use config::PipelineConfig;
pub use coordinator::{Coordinator, CoordinatorOutput, InputCurve};
pub use gain_curve::{EqualizationResult, GainCurveBuilder, GainCurveParams};
pub use optimizer::{BiquadOptimizer, OptimizationReport};
pub use peak_init::{PeakCandidate, PeakInitializer};
pub use smoother::{BandParams, Smoother};
