#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared record types for the vessel-watch density toolchain.
//!
//! A density table is a CSV keyed by `gridID` as produced by the upstream
//! gridding tool; the comparator aligns two of them and emits one
//! [`ComparisonRecord`] per cell.

use serde::{Deserialize, Serialize};

/// Default minimum current/baseline ratio required to flag a cell.
pub const DEFAULT_RATIO_THRESH: f64 = 5.0;

/// Default minimum absolute current density required to flag a cell.
///
/// Expressed in hours for `time_at_cells` densities; use 1.0 and retune
/// the ratio threshold for `vessels_count` densities.
pub const DEFAULT_MIN_CURRENT_DENSITY: f64 = 2.0;

/// Default floor applied to the baseline density before division.
pub const DEFAULT_EPS: f64 = 1e-3;

/// A single grid cell observation from an upstream density table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityRecord {
    /// Opaque spatial cell identifier, stable across snapshots.
    #[serde(rename = "gridID")]
    pub grid_id: String,
    /// Per-cell density metric (hours of presence or vessel count).
    /// The unit is decided upstream and never interpreted here.
    pub density: f64,
    /// Cell centroid longitude, carried through for output and plotting only.
    pub lon_centroid: Option<f64>,
    /// Cell centroid latitude, carried through for output and plotting only.
    pub lat_centroid: Option<f64>,
}

/// One comparator output row: a cell aligned across two snapshots with its
/// derived anomaly metrics.
///
/// Field order matches the output table's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    /// Cell identifier shared by both snapshots.
    #[serde(rename = "gridID")]
    pub grid_id: String,
    /// Centroid longitude, preferring the current snapshot's value.
    pub lon_centroid: Option<f64>,
    /// Centroid latitude, preferring the current snapshot's value.
    pub lat_centroid: Option<f64>,
    /// Density in the historical snapshot; 0.0 when the cell is new.
    pub baseline: f64,
    /// Density in the target snapshot; 0.0 when the cell went quiet.
    pub current: f64,
    /// `current / max(baseline, eps)`.
    pub ratio: f64,
    /// `current - baseline`.
    pub diff: f64,
    /// `ratio * diff`; negative when the cell's density dropped.
    pub score: f64,
    /// Whether the cell crossed both the relative and the absolute threshold.
    pub is_anomaly: bool,
}

/// Thresholds controlling which cells the comparator flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompareParams {
    /// Minimum current/baseline ratio to flag.
    pub ratio_thresh: f64,
    /// Minimum absolute current density to flag. Keeps tiny cells with huge
    /// ratios (e.g. 0.001 -> 0.5 hours) out of the anomaly set.
    pub min_current_density: f64,
    /// Floor applied to baseline before division.
    pub eps: f64,
}

impl Default for CompareParams {
    fn default() -> Self {
        Self {
            ratio_thresh: DEFAULT_RATIO_THRESH,
            min_current_density: DEFAULT_MIN_CURRENT_DENSITY,
            eps: DEFAULT_EPS,
        }
    }
}
