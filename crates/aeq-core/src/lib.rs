//! aeq-core: Shared types, error handling, and the frequency-grid /
//! response-buffer primitives used across the equalization pipeline.

mod error;
mod grid;
mod response_buffer;
mod sigmoid;

pub use error::{AeqError, AeqResult};
pub use grid::{
    generate as generate_grid, interpolate, DEFAULT_F_MAX, DEFAULT_F_MIN, DEFAULT_STEP,
    GRAPHIC_EQ_STEP, GRID_ANCHOR_HZ,
};
pub use response_buffer::{Channel, ResponseBuffer};
pub use sigmoid::{sigmoid_at, sigmoid_curve};

/// Sample rate the parametric-EQ biquad topology is hard-coded to, per
/// spec.md §3/§9.
pub const SAMPLE_RATE_HZ: f64 = 48_000.0;
