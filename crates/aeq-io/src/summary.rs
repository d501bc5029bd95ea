//! Small Markdown summary emitter — the "external collaborator" surface
//! for README/summary emission, replacing the original's README writer.

use crate::parametric_eq::{compute_preamp_db, FilterSpec};
use aeq_core::AeqError;
use aeq_core::AeqResult;
use std::io::Write;
use std::path::Path;

pub fn write_summary_markdown<P: AsRef<Path>>(
    path: P,
    name: &str,
    filters: &[FilterSpec],
) -> AeqResult<()> {
    let preamp_db = compute_preamp_db(filters);

    let mut file = std::fs::File::create(path.as_ref()).map_err(AeqError::Io)?;
    writeln!(file, "# {name}").map_err(AeqError::Io)?;
    writeln!(file).map_err(AeqError::Io)?;
    writeln!(file, "Preamp: {:.1} dB", preamp_db).map_err(AeqError::Io)?;
    writeln!(file).map_err(AeqError::Io)?;
    writeln!(file, "| Filter | Fc (Hz) | Gain (dB) | Q |").map_err(AeqError::Io)?;
    writeln!(file, "|---|---|---|---|").map_err(AeqError::Io)?;
    for (i, f) in filters.iter().enumerate() {
        writeln!(
            file,
            "| {} | {} | {:+.1} | {:.2} |",
            i + 1,
            f.fc.round() as i64,
            f.gain_db,
            f.q
        )
        .map_err(AeqError::Io)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn writes_heading_preamp_and_table() {
        let filters = vec![FilterSpec { fc: 120.0, q: 1.0, gain_db: 3.0 }];
        let file = NamedTempFile::new().unwrap();
        write_summary_markdown(file.path(), "Headphone X", &filters).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.starts_with("# Headphone X"));
        assert!(contents.contains("Preamp: -3.0 dB"));
        assert!(contents.contains("| 1 | 120 | +3.0 | 1.00 |"));
    }
}
