// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors surfaced by the voltage anomaly pipeline.
///
/// `Schema` is unrecoverable: the input has no usable voltage column and no
/// meaningful cleaned output exists. Everything recoverable (unparseable
/// values, out-of-range readings, bad timestamps) is handled by dropping rows
/// and counting them, never through this type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VadError {
    #[error("{0}")]
    Schema(String),
    #[error("{0}")]
    InvalidInput(String),
}

impl VadError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
