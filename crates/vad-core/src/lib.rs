// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared data model for the voltage anomaly pipeline: the raw (string)
//! table shape handed over by I/O collaborators, the cleaned table contract
//! consumed by detection, and the pipeline error type.

#![forbid(unsafe_code)]

mod cleaned;
mod error;
mod raw;

pub use cleaned::{CleanedTable, TimeAxis, TimePoint, TIMESTAMP_RENDER_FORMAT};
pub use error::VadError;
pub use raw::{RawColumn, RawTable};
