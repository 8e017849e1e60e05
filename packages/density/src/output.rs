//! Comparison table writer.
//!
//! The output column order is fixed: `gridID, lon_centroid, lat_centroid,
//! baseline, current, ratio, diff, score, is_anomaly`. The file appears only
//! once the full table has been serialized: rows go to a `.tmp` sibling
//! which is then renamed into place, so a failed run never leaves a partial
//! output behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use vessel_watch_density_models::ComparisonRecord;

use crate::DensityError;

/// Writes the comparison table to `path`.
///
/// # Errors
///
/// Returns [`DensityError`] if the temporary file cannot be written or the
/// rename into place fails.
pub fn write_comparison_csv(
    path: &Path,
    records: &[ComparisonRecord],
) -> Result<(), DensityError> {
    let tmp = tmp_sibling(path);

    let file = std::fs::File::create(&tmp)?;
    write_rows(file, records)?;
    std::fs::rename(&tmp, path)?;

    log::info!(
        "Wrote {} comparison rows to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

fn write_rows<W: Write>(out: W, records: &[ComparisonRecord]) -> Result<(), DensityError> {
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(grid_id: &str) -> ComparisonRecord {
        ComparisonRecord {
            grid_id: grid_id.to_owned(),
            lon_centroid: Some(3_800_500.0),
            lat_centroid: None,
            baseline: 1.0,
            current: 10.0,
            ratio: 10.0,
            diff: 9.0,
            score: 90.0,
            is_anomaly: true,
        }
    }

    fn rows_to_string(records: &[ComparisonRecord]) -> String {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, records).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn header_matches_output_contract() {
        let text = rows_to_string(&[record("A1")]);
        assert_eq!(
            text.lines().next().unwrap(),
            "gridID,lon_centroid,lat_centroid,baseline,current,ratio,diff,score,is_anomaly"
        );
    }

    #[test]
    fn serializes_booleans_and_empty_centroids() {
        let text = rows_to_string(&[record("A1")]);
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "A1,3800500.0,,1.0,10.0,10.0,9.0,90.0,true"
        );
    }

    #[test]
    fn one_row_per_record() {
        let text = rows_to_string(&[record("A1"), record("B2")]);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn tmp_sibling_appends_suffix() {
        assert_eq!(
            tmp_sibling(Path::new("out/anomalies.csv")),
            PathBuf::from("out/anomalies.csv.tmp")
        );
    }
}
