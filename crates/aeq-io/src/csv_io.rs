//! CSV read/write for a `ResponseBuffer`, matching the original's
//! `read_from_csv` / `write_to_csv` column schema.

use aeq_core::{AeqError, AeqResult, Channel, ResponseBuffer};
use std::path::Path;

const FREQUENCY_COLUMN: &str = "frequency";

/// Column order used on write. Only populated channels are emitted.
const WRITE_ORDER: [Channel; 9] = [
    Channel::Raw,
    Channel::Error,
    Channel::Smoothed,
    Channel::ErrorSmoothed,
    Channel::Equalization,
    Channel::ParametricEq,
    Channel::EqualizedRaw,
    Channel::EqualizedSmoothed,
    Channel::Target,
];

/// Reads a response CSV. Accepts any subset of the documented channel
/// columns alongside a mandatory `frequency` column; rows are returned
/// sorted by frequency ascending (ties keep their original order).
pub fn read_response_csv<P: AsRef<Path>>(path: P) -> AeqResult<(Vec<f64>, ResponseBuffer)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path.as_ref())
        .map_err(|e| AeqError::Parse(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| AeqError::Parse(e.to_string()))?
        .clone();

    let freq_idx = headers
        .iter()
        .position(|h| h == FREQUENCY_COLUMN)
        .ok_or_else(|| AeqError::DataMissing("CSV has no frequency column".to_string()))?;

    let channel_columns: Vec<(Channel, usize)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| Channel::from_name(h).map(|c| (c, i)))
        .collect();

    let mut rows: Vec<(f64, Vec<Option<f64>>)> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| AeqError::Parse(e.to_string()))?;
        let freq: f64 = record
            .get(freq_idx)
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| AeqError::Parse("unparsable frequency cell".to_string()))?;

        let mut values = Vec::with_capacity(channel_columns.len());
        for &(_, idx) in &channel_columns {
            let cell = record.get(idx).unwrap_or("").trim();
            values.push(parse_cell(cell));
        }
        rows.push((freq, values));
    }

    if rows.is_empty() {
        return Err(AeqError::DataMissing("input file contains no rows".to_string()));
    }

    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    tracing::debug!(rows = rows.len(), columns = channel_columns.len(), "read response CSV");

    let freqs: Vec<f64> = rows.iter().map(|(f, _)| *f).collect();
    let mut buffer = ResponseBuffer::new();

    for (ci, &(channel, _)) in channel_columns.iter().enumerate() {
        let column: Vec<f64> = rows.iter().map(|(_, v)| v[ci].unwrap_or(f64::NAN)).collect();
        assign_channel(&mut buffer, channel, column);
    }

    Ok((freqs, buffer))
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.eq_ignore_ascii_case("nan") || cell.is_empty() {
        return None;
    }
    cell.parse().ok()
}

fn assign_channel(buffer: &mut ResponseBuffer, channel: Channel, values: Vec<f64>) {
    match channel {
        Channel::Raw => buffer.raw = Some(values),
        Channel::Smoothed => buffer.smoothed = Some(values),
        Channel::Target => buffer.target = Some(values),
        Channel::Error => buffer.error = Some(values),
        Channel::ErrorSmoothed => buffer.error_smoothed = Some(values),
        Channel::Equalization => buffer.equalization = Some(values),
        Channel::EqualizedRaw => buffer.equalized_raw = Some(values),
        Channel::EqualizedSmoothed => buffer.equalized_smoothed = Some(values),
        Channel::ParametricEq => buffer.parametric_eq = Some(values),
    }
}

/// Writes every populated channel of `buffer`, aligned to `freq`, with
/// two-decimal formatting and the literal `NaN` for missing cells.
pub fn write_response_csv<P: AsRef<Path>>(
    path: P,
    freq: &[f64],
    buffer: &ResponseBuffer,
) -> AeqResult<()> {
    let present: Vec<Channel> = WRITE_ORDER
        .into_iter()
        .filter(|&c| buffer.get(c).is_some())
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .from_path(path.as_ref())
        .map_err(|e| AeqError::Parse(e.to_string()))?;

    let mut header = vec![FREQUENCY_COLUMN.to_string()];
    header.extend(present.iter().map(|c| c.name().to_string()));
    writer.write_record(&header).map_err(|e| AeqError::Parse(e.to_string()))?;

    for (i, &f) in freq.iter().enumerate() {
        let mut record = vec![format!("{:.2}", f)];
        for &channel in &present {
            let value = buffer.get(channel).unwrap()[i];
            record.push(format_cell(value));
        }
        writer.write_record(&record).map_err(|e| AeqError::Parse(e.to_string()))?;
    }

    writer.flush().map_err(AeqError::Io)?;
    Ok(())
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn round_trips_populated_channels() {
        let freq = vec![20.0, 1000.0, 20000.0];
        let mut buffer = ResponseBuffer::new();
        buffer.raw = Some(vec![1.234, -2.5, 0.0]);
        buffer.equalization = Some(vec![0.0, 3.33, -1.1]);

        let file = NamedTempFile::new().unwrap();
        write_response_csv(file.path(), &freq, &buffer).unwrap();
        let (read_freq, read_buffer) = read_response_csv(file.path()).unwrap();

        assert_eq!(read_freq, freq);
        assert_eq!(read_buffer.raw, Some(vec![1.23, -2.5, 0.0]));
        assert_eq!(read_buffer.equalization, Some(vec![0.0, 3.33, -1.1]));
    }

    #[test]
    fn missing_cells_round_trip_as_nan() {
        let freq = vec![20.0, 30.0];
        let mut buffer = ResponseBuffer::new();
        buffer.raw = Some(vec![1.0, f64::NAN]);

        let file = NamedTempFile::new().unwrap();
        write_response_csv(file.path(), &freq, &buffer).unwrap();
        let (_, read_buffer) = read_response_csv(file.path()).unwrap();

        assert!(read_buffer.raw.unwrap()[1].is_nan());
    }

    #[test]
    fn empty_file_is_data_missing() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "frequency,raw\n").unwrap();
        let result = read_response_csv(file.path());
        assert!(matches!(result, Err(AeqError::DataMissing(_))));
    }

    #[test]
    fn rows_are_sorted_by_frequency() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "frequency,raw\n100,1\n20,2\n1000,3\n").unwrap();
        let (freq, buffer) = read_response_csv(file.path()).unwrap();
        assert_eq!(freq, vec![20.0, 100.0, 1000.0]);
        assert_eq!(buffer.raw, Some(vec![2.0, 1.0, 3.0]));
    }
}
