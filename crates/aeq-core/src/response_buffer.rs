//! `ResponseBuffer` holds the named, grid-aligned channels of one
//! measurement and enforces reset-on-mutation: writing an upstream channel
//! invalidates every channel that is derived from it.
//!
//! The source this pipeline is modeled on re-checks this by hand at every
//! call site. Here the dependency order is instead a fixed property of the
//! type: each `set_*` method on `ResponseBuffer` clears exactly the
//! channels documented in spec.md §3, so a caller cannot forget to
//! invalidate a downstream array.

use serde::{Deserialize, Serialize};

/// Identifies one of the nine channels a `ResponseBuffer` may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Raw,
    Smoothed,
    Target,
    Error,
    ErrorSmoothed,
    Equalization,
    EqualizedRaw,
    EqualizedSmoothed,
    ParametricEq,
}

impl Channel {
    pub const ALL: [Channel; 9] = [
        Channel::Raw,
        Channel::Smoothed,
        Channel::Target,
        Channel::Error,
        Channel::ErrorSmoothed,
        Channel::Equalization,
        Channel::EqualizedRaw,
        Channel::EqualizedSmoothed,
        Channel::ParametricEq,
    ];

    /// CSV / text column name.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Raw => "raw",
            Channel::Smoothed => "smoothed",
            Channel::Target => "target",
            Channel::Error => "error",
            Channel::ErrorSmoothed => "error_smoothed",
            Channel::Equalization => "equalization",
            Channel::EqualizedRaw => "equalized_raw",
            Channel::EqualizedSmoothed => "equalized_smoothed",
            Channel::ParametricEq => "parametric_eq",
        }
    }

    pub fn from_name(name: &str) -> Option<Channel> {
        Channel::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// A measurement's channels, all aligned to a shared `Vec<f64>` frequency
/// grid owned alongside this buffer (see `Coordinator`/CSV I/O).
#[derive(Debug, Clone, Default)]
pub struct ResponseBuffer {
    pub raw: Option<Vec<f64>>,
    pub smoothed: Option<Vec<f64>>,
    pub target: Option<Vec<f64>>,
    pub error: Option<Vec<f64>>,
    pub error_smoothed: Option<Vec<f64>>,
    pub equalization: Option<Vec<f64>>,
    pub equalized_raw: Option<Vec<f64>>,
    pub equalized_smoothed: Option<Vec<f64>>,
    pub parametric_eq: Option<Vec<f64>>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-lengths (clears) the listed channels.
    pub fn reset(&mut self, channels: &[Channel]) {
        for &c in channels {
            match c {
                Channel::Raw => self.raw = None,
                Channel::Smoothed => self.smoothed = None,
                Channel::Target => self.target = None,
                Channel::Error => self.error = None,
                Channel::ErrorSmoothed => self.error_smoothed = None,
                Channel::Equalization => self.equalization = None,
                Channel::EqualizedRaw => self.equalized_raw = None,
                Channel::EqualizedSmoothed => self.equalized_smoothed = None,
                Channel::ParametricEq => self.parametric_eq = None,
            }
        }
    }

    pub fn get(&self, channel: Channel) -> Option<&[f64]> {
        match channel {
            Channel::Raw => self.raw.as_deref(),
            Channel::Smoothed => self.smoothed.as_deref(),
            Channel::Target => self.target.as_deref(),
            Channel::Error => self.error.as_deref(),
            Channel::ErrorSmoothed => self.error_smoothed.as_deref(),
            Channel::Equalization => self.equalization.as_deref(),
            Channel::EqualizedRaw => self.equalized_raw.as_deref(),
            Channel::EqualizedSmoothed => self.equalized_smoothed.as_deref(),
            Channel::ParametricEq => self.parametric_eq.as_deref(),
        }
    }

    /// Every channel downstream of `raw`: writing raw invalidates all of it.
    const DOWNSTREAM_OF_RAW: [Channel; 8] = [
        Channel::Smoothed,
        Channel::Target,
        Channel::Error,
        Channel::ErrorSmoothed,
        Channel::Equalization,
        Channel::EqualizedRaw,
        Channel::EqualizedSmoothed,
        Channel::ParametricEq,
    ];

    /// Replaces `raw` (interpolation, calibration) and invalidates every
    /// other channel, per spec.md §3's dependency order.
    pub fn set_raw(&mut self, raw: Vec<f64>) {
        self.raw = Some(raw);
        self.reset(&Self::DOWNSTREAM_OF_RAW);
    }

    /// `center()` affects raw and smoothed only; it leaves target,
    /// error, and everything else untouched per spec.md §4.5's
    /// standalone-centering note, but still invalidates stages that
    /// depend on raw/smoothed's *numeric value* further downstream.
    pub fn center_in_place(&mut self, shift: f64) {
        if let Some(raw) = &mut self.raw {
            for v in raw.iter_mut() {
                *v -= shift;
            }
        }
        if let Some(smoothed) = &mut self.smoothed {
            for v in smoothed.iter_mut() {
                *v -= shift;
            }
        }
    }

    /// Writes `target`/`error` from the compensator and invalidates
    /// error_smoothed and everything downstream of it.
    pub fn set_target_and_error(&mut self, target: Vec<f64>, error: Vec<f64>) {
        self.target = Some(target);
        self.error = Some(error);
        self.reset(&[
            Channel::ErrorSmoothed,
            Channel::Equalization,
            Channel::EqualizedRaw,
            Channel::EqualizedSmoothed,
            Channel::ParametricEq,
        ]);
    }

    /// Writes `smoothed` and (if an error channel exists) `error_smoothed`;
    /// invalidates equalization and downstream.
    pub fn set_smoothed(&mut self, smoothed: Vec<f64>, error_smoothed: Option<Vec<f64>>) {
        self.smoothed = Some(smoothed);
        self.error_smoothed = error_smoothed;
        self.reset(&[
            Channel::Equalization,
            Channel::EqualizedRaw,
            Channel::EqualizedSmoothed,
            Channel::ParametricEq,
        ]);
    }

    /// Writes `equalization`, `equalized_raw`, and (if smoothed exists)
    /// `equalized_smoothed`; invalidates parametric_eq.
    pub fn set_equalization(
        &mut self,
        equalization: Vec<f64>,
        equalized_raw: Vec<f64>,
        equalized_smoothed: Option<Vec<f64>>,
    ) {
        self.equalization = Some(equalization);
        self.equalized_raw = Some(equalized_raw);
        self.equalized_smoothed = equalized_smoothed;
        self.reset(&[Channel::ParametricEq]);
    }

    pub fn set_parametric_eq(&mut self, parametric_eq: Vec<f64>) {
        self.parametric_eq = Some(parametric_eq);
    }

    /// Asserts every populated channel has length `len`. Used to enforce
    /// the alignment invariant from spec.md §3/§8 in tests and at stage
    /// boundaries.
    pub fn assert_aligned(&self, len: usize) {
        for c in Channel::ALL {
            if let Some(data) = self.get(c) {
                assert_eq!(data.len(), len, "channel {:?} misaligned with grid", c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_raw_invalidates_everything_else() {
        let mut buf = ResponseBuffer::new();
        buf.set_raw(vec![1.0, 2.0]);
        buf.set_target_and_error(vec![0.0, 0.0], vec![1.0, 2.0]);
        buf.set_smoothed(vec![1.0, 2.0], Some(vec![1.0, 2.0]));
        buf.set_equalization(vec![0.0, 0.0], vec![1.0, 2.0], Some(vec![1.0, 2.0]));
        buf.set_parametric_eq(vec![0.0, 0.0]);

        buf.set_raw(vec![3.0, 4.0]);
        assert!(buf.smoothed.is_none());
        assert!(buf.target.is_none());
        assert!(buf.error.is_none());
        assert!(buf.error_smoothed.is_none());
        assert!(buf.equalization.is_none());
        assert!(buf.equalized_raw.is_none());
        assert!(buf.equalized_smoothed.is_none());
        assert!(buf.parametric_eq.is_none());
    }

    #[test]
    fn set_smoothed_invalidates_equalization_onward() {
        let mut buf = ResponseBuffer::new();
        buf.set_raw(vec![1.0, 2.0]);
        buf.set_equalization(vec![0.0, 0.0], vec![1.0, 2.0], None);
        buf.set_parametric_eq(vec![0.0, 0.0]);

        buf.set_smoothed(vec![1.0, 2.0], None);
        assert!(buf.equalization.is_none());
        assert!(buf.parametric_eq.is_none());
    }

    #[test]
    fn channel_name_round_trips() {
        for c in Channel::ALL {
            assert_eq!(Channel::from_name(c.name()), Some(c));
        }
    }
}
