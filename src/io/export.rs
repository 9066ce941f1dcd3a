//! CSV export for meter readings.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::Reading;

/// Schema v1 column header for CSV telemetry export.
const HEADER: &str = "timestamp_ms,power_w,voltage_v,current_a,frequency_hz,\
                      power_factor,cost,co2_kg,temperature_c";

/// Exports a reading record to a CSV file at the given path.
///
/// Writes a header row followed by one data row per reading using the schema
/// v1 column layout. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(readings: &[Reading], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(readings, buf)
}

/// Writes a reading record as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(readings: &[Reading], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for r in readings {
        wtr.write_record(&[
            r.timestamp_ms.to_string(),
            format!("{:.2}", r.power_w),
            format!("{:.2}", r.voltage_v),
            format!("{:.4}", r.current_a),
            format!("{:.4}", r.frequency_hz),
            format!("{:.4}", r.power_factor),
            format!("{:.8}", r.cost),
            format!("{:.8}", r.co2_kg),
            format!("{:.1}", r.temperature_c),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
