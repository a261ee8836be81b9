// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporting consumer for the voltage anomaly pipeline: a human-readable
//! text summary and a machine-readable JSON report, both built purely from
//! the core's outputs (cleaned table, spike table, detection report,
//! cleaning statistics).

#![forbid(unsafe_code)]

use serde_json::{json, Value};
use std::fmt::Write as _;
use vad_clean::CleanStats;
use vad_core::CleanedTable;
use vad_detect::{DetectReport, SpikeRow, SpikeTable};

const DEFAULT_TOP_SPIKES: usize = 5;

/// Options for [`render_summary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryOptions {
    /// How many spikes to list, ranked by descending |z-score|.
    pub top_spikes: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top_spikes: DEFAULT_TOP_SPIKES,
        }
    }
}

/// Min/max/mean over a cleaned voltage series; `None` for an empty table.
fn voltage_stats(table: &CleanedTable) -> Option<(f64, f64, f64)> {
    let voltage = table.voltage();
    let first = *voltage.first()?;
    let (min, max, sum) = voltage.iter().skip(1).fold(
        (first, first, first),
        |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
    );
    Some((min, max, sum / voltage.len() as f64))
}

/// Spikes ranked by descending |z-score|; rows without a defined z-score rank
/// last, keeping table order among themselves.
fn top_spikes_by_zscore(spikes: &SpikeTable, limit: usize) -> Vec<&SpikeRow> {
    let mut ranked: Vec<&SpikeRow> = spikes.rows().iter().collect();
    ranked.sort_by(|a, b| {
        match (a.zscore, b.zscore) {
            (Some(za), Some(zb)) => zb.abs().total_cmp(&za.abs()),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
    ranked.truncate(limit);
    ranked
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

/// Renders the plain-text anomaly summary: row and spike totals, voltage
/// statistics, and the top spikes by |z-score|.
pub fn render_summary(
    table: &CleanedTable,
    stats: &CleanStats,
    spikes: &SpikeTable,
    report: &DetectReport,
    options: &SummaryOptions,
) -> String {
    let mut out = String::new();
    // Infallible writes: fmt::Write on String never errors.
    let _ = writeln!(out, "=== VOLTAGE ANOMALY REPORT ===");
    let _ = writeln!(out, "Rows in:                  {}", stats.rows_in);
    let _ = writeln!(out, "Rows after cleaning:      {}", stats.rows_out);
    let _ = writeln!(
        out,
        "Rows dropped:             {} type, {} physics, {} bad timestamp, {} duplicate",
        stats.type_errors, stats.physics_errors, stats.bad_timestamps, stats.duplicate_timestamps
    );
    let _ = writeln!(out, "Anomalies detected:       {}", report.combined_spikes);
    let _ = writeln!(
        out,
        "  by z-score: {}   by delta: {}",
        report.zscore_spikes, report.delta_spikes
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "--- Voltage Statistics ---");
    match voltage_stats(table) {
        Some((min, max, mean)) => {
            let _ = writeln!(out, "Min Voltage:  {min:.2}V");
            let _ = writeln!(out, "Max Voltage:  {max:.2}V");
            let _ = writeln!(out, "Mean Voltage: {mean:.2}V");
        }
        None => {
            let _ = writeln!(out, "(no rows survived cleaning)");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "--- Top {} Spikes (by |z-score|) ---",
        options.top_spikes
    );
    let ranked = top_spikes_by_zscore(spikes, options.top_spikes);
    if ranked.is_empty() {
        let _ = writeln!(out, "(none)");
    } else {
        let _ = writeln!(
            out,
            "{:<24} {:>10} {:>10} {:>10}  reason",
            spikes.time_column(),
            "voltage",
            "zscore",
            "delta"
        );
        for row in ranked {
            let _ = writeln!(
                out,
                "{:<24} {:>10.4} {:>10} {:>10}  {}",
                row.time.to_string(),
                row.voltage,
                format_optional(row.zscore),
                format_optional(row.delta),
                row.reason
            );
        }
    }

    out
}

/// Assembles the machine-readable report: detection counts plus cleaning
/// statistics.
pub fn report_json(stats: &CleanStats, report: &DetectReport) -> Value {
    json!({
        "detection": report,
        "cleaning": stats,
    })
}
