//! Error types for the dashboard kernel.
//!
//! Only load-time problems and misuse of the statistics API are errors.
//! Malformed score cells and degenerate correlations are carried as NaN
//! values and never surface here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// The data file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The data file is not well-formed CSV.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a column the schema requires.
    #[error("required column `{column}` is missing from the header")]
    MissingColumn { column: String },

    /// Paired statistics were asked for on sequences of different lengths.
    #[error("sequences differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
}
