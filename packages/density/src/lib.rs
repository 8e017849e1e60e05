#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Density table I/O for the vessel-watch toolchain.
//!
//! Reads the per-cell density CSVs produced by the upstream gridding tool
//! and writes the comparator's combined output table. Ingest is tolerant of
//! partial schemas: only `gridID` is required, and the optional `density`
//! and centroid columns are picked up when present.

pub mod ingest;
pub mod output;

use std::path::PathBuf;

/// Errors that can occur while reading or writing density tables.
#[derive(Debug, thiserror::Error)]
pub enum DensityError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from an input table.
    #[error("missing required column '{column}' in {}", path.display())]
    MissingColumn {
        /// Name of the absent column.
        column: String,
        /// Path of the offending table.
        path: PathBuf,
    },

    /// A density field could not be parsed as a number.
    #[error("invalid density value '{value}' for cell '{grid_id}' in {}", path.display())]
    InvalidDensity {
        /// Cell whose row carried the bad value.
        grid_id: String,
        /// The raw field content.
        value: String,
        /// Path of the offending table.
        path: PathBuf,
    },
}
