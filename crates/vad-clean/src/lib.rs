// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cleaning stage of the voltage anomaly pipeline.
//!
//! Three steps in fixed order: column-name normalization, voltage
//! sanitization, time-axis finalization. Order matters: sanitization assumes
//! canonical names, and duplicate-timestamp removal must only see rows that
//! survived sanitization, otherwise duplicates could be dropped based on rows
//! that were about to be excluded for bad voltage anyway.
//!
//! Data-quality problems never fail the stage: offending rows are dropped and
//! counted in [`CleanStats`]. The only hard failure is a schema problem, a
//! table with no usable voltage column.

#![forbid(unsafe_code)]

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use vad_core::{CleanedTable, RawTable, TimeAxis, VadError};

/// Normalized column names accepted as the voltage column, leftmost wins.
pub const VOLTAGE_CANDIDATES: &[&str] = &["voltage", "v", "volt", "reading"];

/// Normalized column names accepted as the timestamp column, leftmost wins.
pub const TIME_CANDIDATES: &[&str] = &["timestamp", "time", "date"];

/// Timestamp formats accepted during time-axis finalization. RFC 3339 inputs
/// with an explicit offset are also accepted and normalized to UTC.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Physical voltage range for sanitization. Required configuration with no
/// `Default`: plausible bounds differ by orders of magnitude between a
/// generic sensor and a regulated rail, so callers must choose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CleanConfig {
    pub min_v: f64,
    pub max_v: f64,
}

impl CleanConfig {
    pub fn new(min_v: f64, max_v: f64) -> Result<Self, VadError> {
        let config = Self { min_v, max_v };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), VadError> {
        if !self.min_v.is_finite() || !self.max_v.is_finite() {
            return Err(VadError::invalid_input(format!(
                "voltage bounds must be finite; got min_v={}, max_v={}",
                self.min_v, self.max_v
            )));
        }
        if self.min_v >= self.max_v {
            return Err(VadError::invalid_input(format!(
                "voltage bounds must satisfy min_v < max_v; got min_v={}, max_v={}",
                self.min_v, self.max_v
            )));
        }
        Ok(())
    }
}

/// Dropped-row accounting for one cleaning run.
///
/// Invariant: `rows_in == rows_out + type_errors + physics_errors +
/// bad_timestamps + duplicate_timestamps`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub rows_in: usize,
    pub rows_out: usize,
    /// Voltage fields that could not be parsed as a finite number after
    /// unit-stripping. Parse failure takes precedence over range checks, so a
    /// value that is both unparseable and out of range is counted here once.
    pub type_errors: usize,
    /// Numerically valid readings outside `[min_v, max_v]`.
    pub physics_errors: usize,
    /// Rows whose timestamp failed to parse.
    pub bad_timestamps: usize,
    /// Rows removed because an earlier row (in sorted order) had the same
    /// timestamp.
    pub duplicate_timestamps: usize,
    /// True when no timestamp candidate existed and a synthetic dense index
    /// was assigned instead.
    pub synthetic_index: bool,
}

/// Step 1 output: the core-relevant columns selected under canonical names.
#[derive(Clone, Debug, PartialEq, Eq)]
struct NormalizedColumns {
    voltage: Vec<String>,
    timestamp: Option<Vec<String>>,
}

/// Step 1: lowercase and trim every column name, then map the candidate sets
/// onto `voltage` and `timestamp`. The leftmost matching column wins when
/// several would map to the same target. A missing timestamp candidate is
/// fine; a missing voltage candidate is a schema error.
fn normalize_columns(raw: &RawTable) -> Result<NormalizedColumns, VadError> {
    let mut voltage = None;
    let mut timestamp = None;

    for col in raw.columns() {
        let name = col.name.trim().to_lowercase();
        if voltage.is_none() && VOLTAGE_CANDIDATES.contains(&name.as_str()) {
            voltage = Some(col.values.clone());
        } else if timestamp.is_none() && TIME_CANDIDATES.contains(&name.as_str()) {
            timestamp = Some(col.values.clone());
        }
    }

    let voltage = voltage.ok_or_else(|| {
        VadError::schema(format!(
            "no voltage column found; expected one of: {}",
            VOLTAGE_CANDIDATES.join(", ")
        ))
    })?;

    Ok(NormalizedColumns { voltage, timestamp })
}

/// Per-row classification of a raw voltage field.
#[derive(Clone, Copy, Debug, PartialEq)]
enum RowVerdict {
    Keep(f64),
    TypeError,
    PhysicsError,
}

/// Strips a trailing `V`/`v` unit and surrounding whitespace, then parses and
/// range-checks the value. Pure function over the scalar field; the ordering
/// contract (parse failure before range check) lives here.
fn classify_voltage(raw: &str, config: &CleanConfig) -> RowVerdict {
    let stripped = raw
        .trim()
        .strip_suffix(['V', 'v'])
        .unwrap_or_else(|| raw.trim())
        .trim();

    let value = match stripped.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return RowVerdict::TypeError,
    };

    if value < config.min_v || value > config.max_v {
        return RowVerdict::PhysicsError;
    }
    RowVerdict::Keep(value)
}

/// Step 2 output: surviving rows, still in original order, with the raw
/// timestamp field carried alongside for step 3.
struct SanitizedRows {
    voltage: Vec<f64>,
    timestamp: Option<Vec<String>>,
}

fn sanitize_voltage(
    columns: NormalizedColumns,
    config: &CleanConfig,
    stats: &mut CleanStats,
) -> SanitizedRows {
    let has_timestamp = columns.timestamp.is_some();
    let mut voltage = Vec::with_capacity(columns.voltage.len());
    let mut timestamp = has_timestamp.then(Vec::new);

    for (i, raw) in columns.voltage.iter().enumerate() {
        match classify_voltage(raw, config) {
            RowVerdict::Keep(value) => {
                voltage.push(value);
                if let (Some(out), Some(ts)) = (timestamp.as_mut(), columns.timestamp.as_ref()) {
                    out.push(ts[i].clone());
                }
            }
            RowVerdict::TypeError => stats.type_errors += 1,
            RowVerdict::PhysicsError => stats.physics_errors += 1,
        }
    }

    let dropped = stats.type_errors + stats.physics_errors;
    if dropped > 0 {
        log::info!(
            "sanitization dropped {dropped} rows ({} type errors, {} physics errors)",
            stats.type_errors,
            stats.physics_errors
        );
    }

    SanitizedRows { voltage, timestamp }
}

/// Parses one timestamp field, accepting the fixed format list, a bare date
/// (midnight), or RFC 3339 with offset (normalized to UTC).
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|ts| ts.naive_utc())
}

/// Step 3: establish the monotonic, duplicate-free time axis. With a
/// timestamp column: parse (dropping failures), stable-sort ascending, and
/// keep the first occurrence of each timestamp. Without one: assign a dense
/// zero-based synthetic index in original row order.
fn finalize_time_axis(
    rows: SanitizedRows,
    stats: &mut CleanStats,
) -> Result<CleanedTable, VadError> {
    match rows.timestamp {
        None => {
            log::info!("no timestamp column found; using synthetic sample_index");
            stats.synthetic_index = true;
            CleanedTable::new(
                TimeAxis::SampleIndex {
                    n: rows.voltage.len(),
                },
                rows.voltage,
            )
        }
        Some(raw_timestamps) => {
            let mut parsed: Vec<(NaiveDateTime, f64)> = Vec::with_capacity(rows.voltage.len());
            for (raw, voltage) in raw_timestamps.iter().zip(&rows.voltage) {
                match parse_timestamp(raw) {
                    Some(ts) => parsed.push((ts, *voltage)),
                    None => stats.bad_timestamps += 1,
                }
            }
            if stats.bad_timestamps > 0 {
                log::info!("dropped {} rows with unparseable timestamps", stats.bad_timestamps);
            }

            // Stable sort keeps original order among equal timestamps, so
            // "first occurrence in sorted order" is the earliest input row.
            parsed.sort_by_key(|(ts, _)| *ts);

            let mut timestamps = Vec::with_capacity(parsed.len());
            let mut voltage = Vec::with_capacity(parsed.len());
            for (ts, v) in parsed {
                if timestamps.last() == Some(&ts) {
                    stats.duplicate_timestamps += 1;
                    continue;
                }
                timestamps.push(ts);
                voltage.push(v);
            }
            if stats.duplicate_timestamps > 0 {
                log::info!("dropped {} duplicate timestamps", stats.duplicate_timestamps);
            }

            CleanedTable::new(TimeAxis::Timestamps(timestamps), voltage)
        }
    }
}

/// Runs the full cleaning stage over a raw table, producing a new cleaned
/// table plus the dropped-row accounting. The input is never mutated.
///
/// Fails only on schema problems (no voltage candidate) or invalid
/// configuration; every data-quality issue drops rows instead.
pub fn clean(raw: &RawTable, config: &CleanConfig) -> Result<(CleanedTable, CleanStats), VadError> {
    config.validate()?;

    let mut stats = CleanStats {
        rows_in: raw.n_rows(),
        ..CleanStats::default()
    };

    let columns = normalize_columns(raw)?;
    let rows = sanitize_voltage(columns, config, &mut stats);
    let table = finalize_time_axis(rows, &mut stats)?;

    stats.rows_out = table.n();
    Ok((table, stats))
}
