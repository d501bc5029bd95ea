//! EqualizerAPO `ParametricEQ` text emission and the preamp/summary
//! Markdown writer. Deliberately independent of `aeq-dsp`'s `PeakingFilter`
//! type so this crate's dependency graph stays CSV/text-only.

use aeq_core::{AeqError, AeqResult};
use std::io::Write;
use std::path::Path;

/// A peaking filter as emitted by the optimizer, in the shape this crate
/// needs for text output.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub fc: f64,
    pub q: f64,
    pub gain_db: f64,
}

/// Writes one `Filter <i>: ON PK Fc <hz> Hz Gain <d.d> dB Q <d.dd>` line
/// per filter, 1-indexed in emission order.
pub fn write_parametric_eq<P: AsRef<Path>>(path: P, filters: &[FilterSpec]) -> AeqResult<()> {
    let mut file = std::fs::File::create(path.as_ref()).map_err(AeqError::Io)?;
    for (i, f) in filters.iter().enumerate() {
        writeln!(
            file,
            "Filter {}: ON PK Fc {} Hz Gain {:.1} dB Q {:.2}",
            i + 1,
            f.fc.round() as i64,
            f.gain_db,
            f.q
        )
        .map_err(AeqError::Io)?;
    }
    Ok(())
}

/// The preamp to apply so the combined output does not clip digitally:
/// the negative of the maximum positive gain, floored to 0.1 dB
/// resolution.
pub fn compute_preamp_db(filters: &[FilterSpec]) -> f64 {
    let max_positive_gain = filters
        .iter()
        .map(|f| f.gain_db)
        .fold(0.0_f64, f64::max);
    (-max_positive_gain * 10.0).floor() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn writes_one_line_per_filter_one_indexed() {
        let filters = vec![
            FilterSpec { fc: 120.0, q: 1.41, gain_db: 3.2 },
            FilterSpec { fc: 3000.0, q: 2.0, gain_db: -4.5 },
        ];
        let file = NamedTempFile::new().unwrap();
        write_parametric_eq(file.path(), &filters).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Filter 1:"));
        assert!(lines[1].starts_with("Filter 2:"));
        assert!(lines[0].contains("Gain 3.2 dB"));
        assert!(lines[1].contains("Gain -4.5 dB"));
    }

    #[test]
    fn preamp_matches_floored_negative_max_gain() {
        let filters = vec![
            FilterSpec { fc: 120.0, q: 1.0, gain_db: 4.26 },
            FilterSpec { fc: 3000.0, q: 1.0, gain_db: -6.0 },
        ];
        assert_eq!(compute_preamp_db(&filters), -4.2);
    }

    #[test]
    fn preamp_is_zero_when_no_positive_gain() {
        let filters = vec![FilterSpec { fc: 120.0, q: 1.0, gain_db: -2.0 }];
        assert_eq!(compute_preamp_db(&filters), 0.0);
    }
}
