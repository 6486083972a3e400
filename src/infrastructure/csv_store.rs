//! Delimited text input/output for price series and feature tables.
//!
//! Input: a header row with `timestamp` (or `start_timestamp` / `open_time`),
//! `open`, `high`, `low`, `close`, `volume`. Other columns are ignored.
//! Output: the same OHLCV columns followed by every feature column. Sub-second
//! timestamps keep their fraction.

use crate::domain::features::{ColumnValues, FeatureTable};
use crate::domain::market::{Bar, PriceSeries};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
// `%.f` prints nothing for whole seconds, and 3, 6 or 9 digits otherwise
const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// Integer timestamps below this are epoch seconds (up to year 5138), above it milliseconds
const EPOCH_SECONDS_LIMIT: i64 = 100_000_000_000;

#[derive(Debug, Deserialize)]
struct BarRecord {
    #[serde(alias = "start_timestamp", alias = "open_time")]
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Parses epoch seconds or milliseconds (told apart by magnitude), RFC 3339,
/// or `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(epoch) = raw.parse::<i64>() {
        let parsed = if epoch.abs() < EPOCH_SECONDS_LIMIT {
            Utc.timestamp_opt(epoch, 0)
        } else {
            Utc.timestamp_millis_opt(epoch)
        };
        return parsed
            .single()
            .context(format!("Timestamp out of range: {}", raw));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    bail!("Unrecognized timestamp: {}", raw)
}

/// Reads and validates a price series from any CSV source.
pub fn read_price_series<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut bars = Vec::new();
    for (row, record) in csv_reader.deserialize::<BarRecord>().enumerate() {
        let record = record.context(format!("Failed to parse CSV row {}", row + 1))?;
        let timestamp = parse_timestamp(&record.timestamp)
            .context(format!("Invalid timestamp in CSV row {}", row + 1))?;
        bars.push(Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        ));
    }

    Ok(PriceSeries::new(bars)?)
}

pub fn read_price_series_file(path: impl AsRef<Path>) -> Result<PriceSeries> {
    let path = path.as_ref();
    let file = File::open(path).context(format!("Failed to open {}", path.display()))?;
    read_price_series(file).context(format!("Failed to load price series from {}", path.display()))
}

fn format_cell(values: &ColumnValues, row: usize) -> String {
    match values {
        ColumnValues::Flag(v) => if v[row] { "True" } else { "False" }.to_string(),
        ColumnValues::Numeric(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
    }
}

/// Writes the table as CSV: header row, then one row per bar.
pub fn write_feature_table<W: Write>(writer: W, table: &FeatureTable) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["timestamp", "open", "high", "low", "close", "volume"];
    header.extend(table.column_names());
    csv_writer.write_record(&header)?;

    for (row, bar) in table.bars().iter().enumerate() {
        let mut record = vec![
            bar.timestamp.format(OUTPUT_TIMESTAMP_FORMAT).to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ];
        record.extend(table.columns().iter().map(|c| format_cell(&c.values, row)));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_feature_table_file(path: impl AsRef<Path>, table: &FeatureTable) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).context(format!("Failed to create {}", path.display()))?;
    write_feature_table(file, table).context(format!("Failed to write {}", path.display()))
}
