// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{RawColumn, RawTable, VadError};
use chrono::NaiveDateTime;
use std::fmt;

/// Render format for timestamps when a cleaned table is turned back into its
/// raw string shape. Chosen so that re-cleaning the rendered table parses
/// losslessly.
pub const TIMESTAMP_RENDER_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The time axis of a cleaned table: exactly one of real timestamps or a
/// synthetic dense index, never both, never neither.
///
/// The synthetic index is dense and zero-based, so it is stored implicitly as
/// a row count rather than materialized per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeAxis {
    /// Strictly increasing, duplicate-free timestamps.
    Timestamps(Vec<NaiveDateTime>),
    /// Synthetic `0..n` index assigned in original row order.
    SampleIndex { n: usize },
}

impl TimeAxis {
    pub fn len(&self) -> usize {
        match self {
            Self::Timestamps(ts) => ts.len(),
            Self::SampleIndex { n } => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column name this axis carries in tabular form.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Timestamps(_) => "timestamp",
            Self::SampleIndex { .. } => "sample_index",
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::SampleIndex { .. })
    }

    /// The time value at row `i`. Panics if `i` is out of bounds, consistent
    /// with slice indexing on either variant.
    pub fn point(&self, i: usize) -> TimePoint {
        match self {
            Self::Timestamps(ts) => TimePoint::Timestamp(ts[i]),
            Self::SampleIndex { n } => {
                assert!(i < *n, "row {i} out of bounds for axis of length {n}");
                TimePoint::SampleIndex(i)
            }
        }
    }
}

/// One time-axis value, projected out of a [`TimeAxis`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimePoint {
    Timestamp(NaiveDateTime),
    SampleIndex(usize),
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_RENDER_FORMAT)),
            Self::SampleIndex(i) => write!(f, "{i}"),
        }
    }
}

/// Output contract of the cleaning stage: a numeric voltage column plus a
/// monotonic, duplicate-free time axis.
///
/// The constructor enforces the invariants downstream stages rely on so they
/// never need re-checking: lengths agree, every voltage is finite,
/// and timestamps (when present) are strictly increasing. A zero-row table is
/// valid; cleaning drops rows instead of failing.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanedTable {
    time: TimeAxis,
    voltage: Vec<f64>,
}

impl CleanedTable {
    pub fn new(time: TimeAxis, voltage: Vec<f64>) -> Result<Self, VadError> {
        if time.len() != voltage.len() {
            return Err(VadError::invalid_input(format!(
                "time axis length mismatch: {} time values, {} voltage values",
                time.len(),
                voltage.len()
            )));
        }
        if let Some((i, v)) = voltage
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(VadError::invalid_input(format!(
                "voltage must be finite: row {i} has {v}"
            )));
        }
        if let TimeAxis::Timestamps(ts) = &time {
            if let Some(i) = (1..ts.len()).find(|&i| ts[i - 1] >= ts[i]) {
                return Err(VadError::invalid_input(format!(
                    "timestamps must be strictly increasing: row {} ({}) does not precede row {} ({})",
                    i - 1,
                    ts[i - 1],
                    i,
                    ts[i]
                )));
            }
        }
        Ok(Self { time, voltage })
    }

    pub fn n(&self) -> usize {
        self.voltage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }

    pub fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    pub fn time(&self) -> &TimeAxis {
        &self.time
    }

    /// Re-renders the table into its raw string shape, time axis first, so it
    /// can be written out as CSV or fed back through the cleaning stage.
    pub fn to_raw(&self) -> RawTable {
        let time_values: Vec<String> = (0..self.n())
            .map(|i| self.time.point(i).to_string())
            .collect();
        let voltage_values: Vec<String> = self.voltage.iter().map(|v| v.to_string()).collect();
        RawTable::from_equal_length_columns(vec![
            RawColumn::new(self.time.column_name(), time_values),
            RawColumn::new("voltage", voltage_values),
        ])
    }
}
