//! EqualizerAPO `GraphicEQ` text emission.

use aeq_core::{generate_grid, interpolate, AeqError, AeqResult, GRAPHIC_EQ_STEP};
use std::io::Write;
use std::path::Path;

const GRAPHIC_EQ_F_MIN: f64 = 20.0;
const GRAPHIC_EQ_F_MAX: f64 = 20_000.0;

/// Resamples `equalization` onto a log grid with step 1.07 over
/// [20, 20000] Hz and writes the single-line `GraphicEQ: 10 -84; f1 g1; ...`
/// format, one decimal place on gains.
pub fn write_graphic_eq<P: AsRef<Path>>(
    path: P,
    freq: &[f64],
    equalization: &[f64],
) -> AeqResult<()> {
    let resampled_freq = generate_grid(GRAPHIC_EQ_F_MIN, GRAPHIC_EQ_F_MAX, GRAPHIC_EQ_STEP);
    let resampled_gain = interpolate(freq, equalization, &resampled_freq, 1);

    let points: Vec<String> = resampled_freq
        .iter()
        .zip(resampled_gain.iter())
        .map(|(f, g)| format!("{} {:.1}", f.round() as i64, g))
        .collect();

    let line = format!("GraphicEQ: 10 -84; {}", points.join("; "));

    let mut file = std::fs::File::create(path.as_ref()).map_err(AeqError::Io)?;
    writeln!(file, "{}", line).map_err(AeqError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn writes_a_single_graphic_eq_line() {
        let freq = vec![20.0, 1000.0, 20000.0];
        let eq = vec![3.0, 0.0, -2.0];
        let file = NamedTempFile::new().unwrap();
        write_graphic_eq(file.path(), &freq, &eq).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.starts_with("GraphicEQ: 10 -84; "));
        assert_eq!(contents.lines().count(), 1);
    }
}
