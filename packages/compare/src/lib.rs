#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Cell-level anomaly comparison between two density snapshots.
//!
//! Aligns a baseline and a current density table on `gridID` with full
//! outer-join semantics (a cell missing from one side gets density 0.0),
//! computes ratio/diff/score metrics per cell, and flags cells that cross
//! both a relative and an absolute threshold.

pub mod summary;

use std::collections::BTreeMap;

use vessel_watch_density_models::{CompareParams, ComparisonRecord, DensityRecord};

/// A cell as observed in up to two snapshots, before metric computation.
#[derive(Default)]
struct CellPair {
    baseline: Option<DensityRecord>,
    current: Option<DensityRecord>,
}

/// Aligns the two snapshots and derives a [`ComparisonRecord`] per cell.
///
/// Every `gridID` present in either input appears exactly once in the
/// result, ordered by `gridID`. Duplicate `gridID`s within one input
/// collapse to the last row seen.
#[must_use]
pub fn compare_cells(
    baseline: Vec<DensityRecord>,
    current: Vec<DensityRecord>,
    params: &CompareParams,
) -> Vec<ComparisonRecord> {
    let mut cells: BTreeMap<String, CellPair> = BTreeMap::new();

    for record in baseline {
        let grid_id = record.grid_id.clone();
        cells.entry(grid_id).or_default().baseline = Some(record);
    }
    for record in current {
        let grid_id = record.grid_id.clone();
        cells.entry(grid_id).or_default().current = Some(record);
    }

    log::info!("Comparing {} distinct grid cells", cells.len());

    cells
        .into_iter()
        .map(|(grid_id, pair)| score_cell(grid_id, &pair, params))
        .collect()
}

fn score_cell(grid_id: String, pair: &CellPair, params: &CompareParams) -> ComparisonRecord {
    let baseline = pair.baseline.as_ref().map_or(0.0, |r| r.density);
    let current = pair.current.as_ref().map_or(0.0, |r| r.density);

    // Prefer the current snapshot's centroid, fall back to baseline's.
    let lon_centroid = pair
        .current
        .as_ref()
        .and_then(|r| r.lon_centroid)
        .or_else(|| pair.baseline.as_ref().and_then(|r| r.lon_centroid));
    let lat_centroid = pair
        .current
        .as_ref()
        .and_then(|r| r.lat_centroid)
        .or_else(|| pair.baseline.as_ref().and_then(|r| r.lat_centroid));

    let ratio = current / baseline.max(params.eps);
    let diff = current - baseline;
    let score = ratio * diff;
    let is_anomaly = ratio >= params.ratio_thresh && current >= params.min_current_density;

    ComparisonRecord {
        grid_id,
        lon_centroid,
        lat_centroid,
        baseline,
        current,
        ratio,
        diff,
        score,
        is_anomaly,
    }
}

/// Number of flagged cells.
#[must_use]
pub fn anomaly_count(records: &[ComparisonRecord]) -> usize {
    records.iter().filter(|r| r.is_anomaly).count()
}

/// Returns the `n` records with the highest score, descending. Shorter than
/// `n` when there are fewer records.
#[must_use]
pub fn top_by_score(records: &[ComparisonRecord], n: usize) -> Vec<&ComparisonRecord> {
    let mut sorted: Vec<&ComparisonRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(grid_id: &str, density: f64) -> DensityRecord {
        DensityRecord {
            grid_id: grid_id.to_owned(),
            density,
            lon_centroid: None,
            lat_centroid: None,
        }
    }

    fn record_at(grid_id: &str, density: f64, lon: f64, lat: f64) -> DensityRecord {
        DensityRecord {
            grid_id: grid_id.to_owned(),
            density,
            lon_centroid: Some(lon),
            lat_centroid: Some(lat),
        }
    }

    #[test]
    fn flags_cell_with_large_ratio_and_absolute_density() {
        let rows = compare_cells(
            vec![record("A1", 1.0)],
            vec![record("A1", 10.0)],
            &CompareParams::default(),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].baseline, 1.0);
        assert_eq!(rows[0].current, 10.0);
        assert_eq!(rows[0].ratio, 10.0);
        assert_eq!(rows[0].diff, 9.0);
        assert_eq!(rows[0].score, 90.0);
        assert!(rows[0].is_anomaly);
    }

    #[test]
    fn new_cell_below_min_density_is_not_flagged() {
        // Huge ratio against the eps floor, but too quiet to matter.
        let rows = compare_cells(
            Vec::new(),
            vec![record("B2", 1.5)],
            &CompareParams::default(),
        );

        assert_eq!(rows[0].baseline, 0.0);
        assert_eq!(rows[0].ratio, 1.5 / 1e-3);
        assert_eq!(rows[0].diff, 1.5);
        assert_eq!(rows[0].score, (1.5 / 1e-3) * 1.5);
        assert!(!rows[0].is_anomaly);
    }

    #[test]
    fn zero_baseline_divides_by_eps() {
        let rows = compare_cells(
            vec![record("A1", 0.0)],
            vec![record("A1", 3.0)],
            &CompareParams::default(),
        );

        assert_eq!(rows[0].ratio, 3.0 / 1e-3);
        assert!(rows[0].is_anomaly);
    }

    #[test]
    fn cell_only_in_baseline_gets_zero_current() {
        let rows = compare_cells(
            vec![record("A1", 4.0)],
            Vec::new(),
            &CompareParams::default(),
        );

        assert_eq!(rows[0].current, 0.0);
        assert_eq!(rows[0].ratio, 0.0);
        assert_eq!(rows[0].diff, -4.0);
        assert_eq!(rows[0].score, 0.0);
        assert!(!rows[0].is_anomaly);
    }

    #[test]
    fn high_ratio_alone_does_not_flag() {
        let params = CompareParams {
            ratio_thresh: 5.0,
            min_current_density: 2.0,
            eps: 1e-3,
        };
        // ratio = 10.0 but current < min_current_density
        let rows = compare_cells(vec![record("A1", 0.1)], vec![record("A1", 1.0)], &params);
        assert_eq!(rows[0].ratio, 10.0);
        assert!(!rows[0].is_anomaly);
    }

    #[test]
    fn high_density_alone_does_not_flag() {
        // current well above the absolute floor, but only 2x the baseline
        let rows = compare_cells(
            vec![record("A1", 5.0)],
            vec![record("A1", 10.0)],
            &CompareParams::default(),
        );
        assert_eq!(rows[0].ratio, 2.0);
        assert!(!rows[0].is_anomaly);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let rows = compare_cells(
            vec![record("A1", 0.4)],
            vec![record("A1", 2.0)],
            &CompareParams::default(),
        );
        // ratio exactly 5.0, current exactly 2.0
        assert_eq!(rows[0].ratio, 5.0);
        assert!(rows[0].is_anomaly);
    }

    #[test]
    fn output_covers_union_of_grid_ids() {
        let rows = compare_cells(
            vec![record("A1", 1.0), record("B2", 2.0)],
            vec![record("B2", 3.0), record("C3", 4.0)],
            &CompareParams::default(),
        );

        let ids: Vec<&str> = rows.iter().map(|r| r.grid_id.as_str()).collect();
        assert_eq!(ids, ["A1", "B2", "C3"]);
    }

    #[test]
    fn prefers_current_centroid() {
        let rows = compare_cells(
            vec![record_at("A1", 1.0, 10.0, 20.0)],
            vec![record_at("A1", 2.0, 11.0, 21.0)],
            &CompareParams::default(),
        );

        assert_eq!(rows[0].lon_centroid, Some(11.0));
        assert_eq!(rows[0].lat_centroid, Some(21.0));
    }

    #[test]
    fn falls_back_to_baseline_centroid() {
        // Current snapshot carries no centroid columns at all.
        let rows = compare_cells(
            vec![record_at("A1", 1.0, 10.0, 20.0)],
            vec![record("A1", 2.0)],
            &CompareParams::default(),
        );

        assert_eq!(rows[0].lon_centroid, Some(10.0));
        assert_eq!(rows[0].lat_centroid, Some(20.0));
    }

    #[test]
    fn centroid_comes_from_whichever_side_has_the_cell() {
        let rows = compare_cells(
            vec![record_at("A1", 1.0, 10.0, 20.0)],
            vec![record_at("B2", 2.0, 30.0, 40.0)],
            &CompareParams::default(),
        );

        assert_eq!(rows[0].grid_id, "A1");
        assert_eq!(rows[0].lon_centroid, Some(10.0));
        assert_eq!(rows[1].grid_id, "B2");
        assert_eq!(rows[1].lon_centroid, Some(30.0));
    }

    #[test]
    fn duplicate_input_rows_collapse_to_last() {
        let rows = compare_cells(
            vec![record("A1", 1.0), record("A1", 2.0)],
            Vec::new(),
            &CompareParams::default(),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].baseline, 2.0);
    }

    #[test]
    fn anomaly_count_counts_flags() {
        let rows = compare_cells(
            vec![record("A1", 1.0), record("B2", 5.0)],
            vec![record("A1", 10.0), record("B2", 10.0)],
            &CompareParams::default(),
        );

        assert_eq!(anomaly_count(&rows), 1);
    }

    #[test]
    fn top_by_score_sorts_descending_and_truncates() {
        let rows = compare_cells(
            vec![record("A1", 1.0)],
            vec![record("A1", 10.0), record("B2", 1.5), record("C3", 0.5)],
            &CompareParams::default(),
        );

        let top = top_by_score(&rows, 2);
        assert_eq!(top.len(), 2);
        assert!(top[0].score >= top[1].score);
        assert_eq!(top[0].grid_id, "B2"); // 1500x ratio dominates the score

        let all = top_by_score(&rows, 10);
        assert_eq!(all.len(), 3);
    }
}
