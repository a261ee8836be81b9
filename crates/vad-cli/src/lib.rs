// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline orchestration shared by the `vad` binary and integration tests:
//! cleaning followed by detection over one raw table.

#![forbid(unsafe_code)]

use vad_clean::{clean, CleanConfig, CleanStats};
use vad_core::{CleanedTable, RawTable, VadError};
use vad_detect::{detect, DetectConfig, DetectReport, SpikeTable};

/// Everything one pipeline run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    pub cleaned: CleanedTable,
    pub clean_stats: CleanStats,
    pub spikes: SpikeTable,
    pub report: DetectReport,
}

/// Cleans a raw table and runs spike detection over the survivors.
///
/// Fails only on a missing voltage column or an invalid configuration; data
/// quality problems are dropped rows counted in [`CleanStats`], never errors.
pub fn run_pipeline(
    raw: &RawTable,
    clean_config: &CleanConfig,
    detect_config: &DetectConfig,
) -> Result<PipelineOutput, VadError> {
    let (cleaned, clean_stats) = clean(raw, clean_config)?;
    let (spikes, report) = detect(&cleaned, detect_config)?;
    Ok(PipelineOutput {
        cleaned,
        clean_stats,
        spikes,
        report,
    })
}
