// SPDX-License-Identifier: MIT OR Apache-2.0

//! Detection stage of the voltage anomaly pipeline.
//!
//! Two independent criteria over the cleaned voltage series, combined by OR:
//! a rolling z-score against trailing local statistics, and an absolute
//! sample-to-sample delta. Every flagged row carries the values that fired
//! and a human-readable reason.

#![forbid(unsafe_code)]

mod rolling;

use rolling::rolling_mean_std;
use std::fmt;
use vad_core::{CleanedTable, TimePoint, VadError};

const DEFAULT_WINDOW: usize = 20;
const DEFAULT_MIN_PERIODS: usize = 10;
const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;
const DEFAULT_DELTA_THRESHOLD: f64 = 20.0;

/// Configuration for [`detect`].
///
/// Windows are always trailing (causal); there is deliberately no centering
/// knob, since a centered window would leak future samples into the signal.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectConfig {
    /// Rolling window length for local statistics.
    pub window: usize,
    /// Minimum observations in the window before statistics are defined.
    pub min_periods: usize,
    /// |z-score| above which a sample is flagged (strict inequality).
    pub zscore_threshold: f64,
    /// Absolute sample-to-sample change, in volts, above which a sample is
    /// flagged (strict inequality).
    pub delta_threshold: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            min_periods: DEFAULT_MIN_PERIODS,
            zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
            delta_threshold: DEFAULT_DELTA_THRESHOLD,
        }
    }
}

impl DetectConfig {
    pub fn validate(&self) -> Result<(), VadError> {
        if self.window < 1 {
            return Err(VadError::invalid_input(format!(
                "DetectConfig.window must be >= 1; got {}",
                self.window
            )));
        }
        if self.min_periods < 1 || self.min_periods > self.window {
            return Err(VadError::invalid_input(format!(
                "DetectConfig.min_periods must be in 1..=window ({}); got {}",
                self.window, self.min_periods
            )));
        }
        if !self.zscore_threshold.is_finite() || self.zscore_threshold <= 0.0 {
            return Err(VadError::invalid_input(format!(
                "DetectConfig.zscore_threshold must be finite and > 0; got {}",
                self.zscore_threshold
            )));
        }
        if !self.delta_threshold.is_finite() || self.delta_threshold <= 0.0 {
            return Err(VadError::invalid_input(format!(
                "DetectConfig.delta_threshold must be finite and > 0; got {}",
                self.delta_threshold
            )));
        }
        Ok(())
    }
}

/// Which criteria fired for a flagged sample, rendered in the fixed order
/// `zscore`, then `delta`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpikeReason {
    Zscore,
    Delta,
    ZscoreDelta,
}

impl SpikeReason {
    fn from_criteria(zscore_fired: bool, delta_fired: bool) -> Option<Self> {
        match (zscore_fired, delta_fired) {
            (true, true) => Some(Self::ZscoreDelta),
            (true, false) => Some(Self::Zscore),
            (false, true) => Some(Self::Delta),
            (false, false) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zscore => "zscore",
            Self::Delta => "delta",
            Self::ZscoreDelta => "zscore+delta",
        }
    }
}

impl fmt::Display for SpikeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flagged sample: the cleaned row's time-axis value and voltage plus the
/// detection evidence. `zscore` is `None` where the rolling statistics were
/// undefined (warmup, single observation, or flat window); `delta` is `None`
/// only for the first sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpikeRow {
    pub time: TimePoint,
    pub voltage: f64,
    pub zscore: Option<f64>,
    pub delta: Option<f64>,
    pub reason: SpikeReason,
}

/// All flagged samples, in cleaned-table row order (chronological when a
/// timestamp axis exists).
#[derive(Clone, Debug, PartialEq)]
pub struct SpikeTable {
    time_column: &'static str,
    rows: Vec<SpikeRow>,
}

impl SpikeTable {
    /// Name of the time-axis column the rows carry: `timestamp` or
    /// `sample_index`, matching the cleaned table.
    pub fn time_column(&self) -> &'static str {
        self.time_column
    }

    pub fn rows(&self) -> &[SpikeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Summary counts for one detection run. `combined_spikes` counts rows
/// flagged by either criterion, so it is at most `zscore_spikes +
/// delta_spikes`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetectReport {
    pub total_samples: usize,
    pub zscore_spikes: usize,
    pub delta_spikes: usize,
    pub combined_spikes: usize,
}

/// Runs spike detection over a cleaned table.
///
/// Deterministic: the same table and config always produce identical output.
/// A series shorter than `min_periods` or a run with zero spikes is a valid
/// outcome reflected in the report, not an error; the only failure mode is an
/// invalid configuration. A z-score is undefined (and never flags) when the
/// rolling statistics are undefined or the rolling std is exactly zero; a
/// perfectly flat window has no meaningful z-score.
pub fn detect(
    table: &CleanedTable,
    config: &DetectConfig,
) -> Result<(SpikeTable, DetectReport), VadError> {
    config.validate()?;

    let voltage = table.voltage();
    let stats = rolling_mean_std(voltage, config.window, config.min_periods);

    let mut rows = Vec::new();
    let mut report = DetectReport {
        total_samples: table.n(),
        ..DetectReport::default()
    };

    for (i, &v) in voltage.iter().enumerate() {
        let zscore = match (stats.mean[i], stats.std[i]) {
            (Some(mean), Some(std)) if std > 0.0 => Some((v - mean) / std),
            _ => None,
        };
        let delta = (i > 0).then(|| (v - voltage[i - 1]).abs());

        let zscore_fired = zscore.is_some_and(|z| z.abs() > config.zscore_threshold);
        let delta_fired = delta.is_some_and(|d| d > config.delta_threshold);

        if zscore_fired {
            report.zscore_spikes += 1;
        }
        if delta_fired {
            report.delta_spikes += 1;
        }

        if let Some(reason) = SpikeReason::from_criteria(zscore_fired, delta_fired) {
            rows.push(SpikeRow {
                time: table.time().point(i),
                voltage: v,
                zscore,
                delta,
                reason,
            });
        }
    }

    report.combined_spikes = rows.len();
    Ok((
        SpikeTable {
            time_column: table.time().column_name(),
            rows,
        },
        report,
    ))
}
