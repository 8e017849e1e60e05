//! Density table ingest.
//!
//! A density table is expected to carry the columns `gridID`, `density`,
//! `lon_centroid`, and `lat_centroid`. Only `gridID` is mandatory; the rest
//! are picked up when present and any extra columns are ignored, matching
//! whatever subset the upstream tool emitted. Header names are matched after
//! trimming whitespace.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use vessel_watch_density_models::DensityRecord;

use crate::DensityError;

/// Column positions resolved from a header row.
struct ColumnLayout {
    grid_id: usize,
    density: Option<usize>,
    lon_centroid: Option<usize>,
    lat_centroid: Option<usize>,
}

impl ColumnLayout {
    /// Locates the expected columns in `headers`. Returns `None` when the
    /// `gridID` column is absent (the table cannot be joined).
    fn resolve(headers: &csv::StringRecord) -> Option<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        Some(Self {
            grid_id: find("gridID")?,
            density: find("density"),
            lon_centroid: find("lon_centroid"),
            lat_centroid: find("lat_centroid"),
        })
    }
}

/// Reads a density table from `path`.
///
/// # Errors
///
/// Returns [`DensityError`] if the file cannot be opened, is not valid CSV,
/// lacks a `gridID` column, or carries a non-numeric density value.
pub fn read_density_csv(path: &Path) -> Result<Vec<DensityRecord>, DensityError> {
    let file = File::open(path)?;
    let records = read_density(file, path)?;
    log::info!("Read {} density rows from {}", records.len(), path.display());
    Ok(records)
}

fn read_density<R: Read>(input: R, path: &Path) -> Result<Vec<DensityRecord>, DensityError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.headers()?.clone();
    let Some(layout) = ColumnLayout::resolve(&headers) else {
        return Err(DensityError::MissingColumn {
            column: "gridID".to_owned(),
            path: path.to_path_buf(),
        });
    };

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let grid_id = row.get(layout.grid_id).unwrap_or("").trim().to_owned();

        let density = match layout.density.and_then(|i| row.get(i)) {
            Some(raw) => parse_density(raw, &grid_id, path)?,
            None => 0.0,
        };

        records.push(DensityRecord {
            grid_id,
            density,
            lon_centroid: parse_centroid(layout.lon_centroid.and_then(|i| row.get(i))),
            lat_centroid: parse_centroid(layout.lat_centroid.and_then(|i| row.get(i))),
        });
    }

    Ok(records)
}

/// An empty density field counts as zero; anything else must parse.
fn parse_density(raw: &str, grid_id: &str, path: &Path) -> Result<f64, DensityError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse()
        .map_err(|_| DensityError::InvalidDensity {
            grid_id: grid_id.to_owned(),
            value: trimmed.to_owned(),
            path: path.to_path_buf(),
        })
}

/// Centroids are pass-through values; a missing or unparseable field is
/// simply an absent coordinate.
fn parse_centroid(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse().ok())
}

/// Collapses duplicate `gridID`s, keeping the maximum density per cell and
/// the first-seen centroid pair. Output is ordered by `gridID`.
#[must_use]
pub fn dedupe_max(records: Vec<DensityRecord>) -> Vec<DensityRecord> {
    let mut by_cell: BTreeMap<String, DensityRecord> = BTreeMap::new();

    for record in records {
        match by_cell.entry(record.grid_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                let kept = slot.get_mut();
                if record.density > kept.density {
                    kept.density = record.density;
                }
            }
        }
    }

    by_cell.into_values().collect()
}
