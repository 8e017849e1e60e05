//! Fixed-width console rendering of comparison rows.
//!
//! Mirrors the output table's column order, right-aligned under the column
//! headers, with no row-index column.

use std::fmt::Write as _;

use vessel_watch_density_models::ComparisonRecord;

const HEADERS: [&str; 9] = [
    "gridID",
    "lon_centroid",
    "lat_centroid",
    "baseline",
    "current",
    "ratio",
    "diff",
    "score",
    "is_anomaly",
];

/// Renders `records` as a fixed-width text table, one line per record plus a
/// header line.
#[must_use]
pub fn render_table(records: &[&ComparisonRecord]) -> String {
    let rows: Vec<[String; 9]> = records.iter().map(|r| row_cells(r)).collect();

    let mut widths: [usize; 9] = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(str::to_owned), &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String; 9], widths: &[usize; 9]) {
    for (i, (cell, &width)) in cells.iter().zip(widths.iter()).enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        let _ = write!(out, "{cell:>width$}");
    }
    out.push('\n');
}

fn row_cells(record: &ComparisonRecord) -> [String; 9] {
    [
        record.grid_id.clone(),
        fmt_centroid(record.lon_centroid),
        fmt_centroid(record.lat_centroid),
        fmt_num(record.baseline),
        fmt_num(record.current),
        fmt_num(record.ratio),
        fmt_num(record.diff),
        fmt_num(record.score),
        record.is_anomaly.to_string(),
    ]
}

/// Shortest float form that still reads as a float ("10.0", never "10").
fn fmt_num(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn fmt_centroid(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_owned(), fmt_num)
}
