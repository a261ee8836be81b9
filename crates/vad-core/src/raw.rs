// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::VadError;

/// One named column of raw string values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<String>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An untyped table as handed over by the I/O collaborator: ordered, named
/// columns of equal length. Values may still carry units or garbage; the
/// cleaning stage owns all interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTable {
    columns: Vec<RawColumn>,
}

impl RawTable {
    /// Constructs a validated `RawTable`. All columns must have the same
    /// number of rows; a table with zero columns is allowed and has zero rows.
    pub fn new(columns: Vec<RawColumn>) -> Result<Self, VadError> {
        if let Some(first) = columns.first() {
            let n = first.values.len();
            for col in &columns {
                if col.values.len() != n {
                    return Err(VadError::invalid_input(format!(
                        "column length mismatch: '{}' has {} rows, '{}' has {}",
                        first.name,
                        n,
                        col.name,
                        col.values.len()
                    )));
                }
            }
        }
        Ok(Self { columns })
    }

    /// Crate-internal constructor for columns already known to be equal
    /// length (e.g. rendered from a `CleanedTable`).
    pub(crate) fn from_equal_length_columns(columns: Vec<RawColumn>) -> Self {
        Self { columns }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |col| col.values.len())
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    /// Finds a column by exact name, returning the leftmost match.
    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|col| col.name == name)
    }
}
