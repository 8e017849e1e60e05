#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Density map rendering.
//!
//! Draws a density table as a scatter plot of cell centroids colored by
//! density magnitude (dark-to-hot ramp) and writes it to a PNG, with axis
//! labels for the projected coordinates and a vertical color scale. Cells
//! without centroid coordinates cannot be placed and are skipped.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use vessel_watch_density_models::DensityRecord;

/// Canvas size of the rendered map, in pixels.
const CANVAS: (u32, u32) = (1200, 800);
/// Point radius of a plotted cell, in pixels.
const POINT_SIZE: u32 = 2;
/// Horizontal space reserved on the right for the color scale.
const SCALE_MARGIN: u32 = 90;

/// Errors that can occur while rendering a density map.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Nothing to draw: no record carried both centroid coordinates.
    #[error("no plottable cells: every record is missing centroid coordinates")]
    NoPlottableCells,

    /// The plotting backend failed (font, encoding, or file write).
    #[error("drawing failed: {0}")]
    Drawing(String),
}

/// A plottable cell: centroid position plus density.
struct PlotCell {
    lon: f64,
    lat: f64,
    density: f64,
}

/// Data ranges of the plottable cells.
struct MapExtent {
    lon: (f64, f64),
    lat: (f64, f64),
    density: (f64, f64),
}

impl MapExtent {
    fn of(cells: &[PlotCell]) -> Self {
        let mut extent = Self {
            lon: (f64::INFINITY, f64::NEG_INFINITY),
            lat: (f64::INFINITY, f64::NEG_INFINITY),
            density: (f64::INFINITY, f64::NEG_INFINITY),
        };
        for cell in cells {
            extent.lon = (extent.lon.0.min(cell.lon), extent.lon.1.max(cell.lon));
            extent.lat = (extent.lat.0.min(cell.lat), extent.lat.1.max(cell.lat));
            extent.density = (
                extent.density.0.min(cell.density),
                extent.density.1.max(cell.density),
            );
        }
        extent
    }
}

/// Density min/max across `records`, or `None` when empty.
#[must_use]
pub fn density_range(records: &[DensityRecord]) -> Option<(f64, f64)> {
    records.iter().map(|r| r.density).fold(None, |range, d| {
        let (min, max) = range.unwrap_or((d, d));
        Some((min.min(d), max.max(d)))
    })
}

/// Renders `records` as a color-mapped scatter map and writes it to
/// `output` as a PNG.
///
/// # Errors
///
/// Returns [`RenderError`] if no record carries centroid coordinates or if
/// the plotting backend fails.
pub fn render_density_map(
    records: &[DensityRecord],
    output: &Path,
    title: &str,
) -> Result<(), RenderError> {
    let cells: Vec<PlotCell> = records
        .iter()
        .filter_map(|r| match (r.lon_centroid, r.lat_centroid) {
            (Some(lon), Some(lat)) => Some(PlotCell {
                lon,
                lat,
                density: r.density,
            }),
            _ => None,
        })
        .collect();

    if cells.is_empty() {
        return Err(RenderError::NoPlottableCells);
    }
    if cells.len() < records.len() {
        log::warn!(
            "Skipping {} cells without centroid coordinates",
            records.len() - cells.len()
        );
    }

    let extent = MapExtent::of(&cells);
    log::info!(
        "Rendering {} cells, density {:.4} to {:.4}",
        cells.len(),
        extent.density.0,
        extent.density.1
    );

    let root = BitMapBackend::new(output, CANVAS).into_drawing_area();
    root.fill(&WHITE).map_err(|e| RenderError::Drawing(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .margin_right(SCALE_MARGIN)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(range_of(extent.lon), range_of(extent.lat))
        .map_err(|e| RenderError::Drawing(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Longitude (EPSG:3035)")
        .y_desc("Latitude (EPSG:3035)")
        .draw()
        .map_err(|e| RenderError::Drawing(e.to_string()))?;

    chart
        .draw_series(cells.iter().map(|cell| {
            let t = normalize(cell.density, extent.density);
            Circle::new((cell.lon, cell.lat), POINT_SIZE, heat_color(t).filled())
        }))
        .map_err(|e| RenderError::Drawing(e.to_string()))?;

    draw_color_scale(&root, extent.density)?;

    root.present().map_err(|e| RenderError::Drawing(e.to_string()))?;
    log::info!("Saved density map to {}", output.display());
    Ok(())
}

/// Draws a vertical color scale on the right edge, labeled with the density
/// extremes.
fn draw_color_scale(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    (min, max): (f64, f64),
) -> Result<(), RenderError> {
    let (width, height) = area.dim_in_pixel();
    #[allow(clippy::cast_possible_wrap)]
    let x0 = (width - SCALE_MARGIN + 30) as i32;
    let top = 60;
    #[allow(clippy::cast_possible_wrap)]
    let bottom = (height - 60) as i32;

    for y in top..bottom {
        let t = f64::from(bottom - y) / f64::from(bottom - top);
        area.draw(&Rectangle::new(
            [(x0, y), (x0 + 16, y + 1)],
            heat_color(t).filled(),
        ))
        .map_err(|e| RenderError::Drawing(e.to_string()))?;
    }

    let label = |text: String, pos: (i32, i32)| Text::new(text, pos, ("sans-serif", 14));
    area.draw(&label(format!("{max:.2}"), (x0 + 20, top - 7)))
        .map_err(|e| RenderError::Drawing(e.to_string()))?;
    area.draw(&label(format!("{min:.2}"), (x0 + 20, bottom - 7)))
        .map_err(|e| RenderError::Drawing(e.to_string()))?;
    area.draw(&label("density".to_owned(), (x0 - 10, top - 28)))
        .map_err(|e| RenderError::Drawing(e.to_string()))?;

    Ok(())
}

/// Expands a min/max pair into an axis range with a little padding so edge
/// cells are not clipped.
fn range_of((min, max): (f64, f64)) -> std::ops::Range<f64> {
    let span = max - min;
    let pad = if span > 0.0 { span * 0.02 } else { 0.5 };
    (min - pad)..(max + pad)
}

/// Maps a density onto [0, 1] within `(min, max)`. A degenerate range (all
/// cells equal) maps to the middle of the ramp.
fn normalize(density: f64, (min, max): (f64, f64)) -> f64 {
    let span = max - min;
    if span > 0.0 {
        ((density - min) / span).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Dark-to-hot ramp: black through red and yellow to white.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let red = (t * 3.0).min(1.0);
    let green = (t * 3.0 - 1.0).clamp(0.0, 1.0);
    let blue = (t * 3.0 - 2.0).clamp(0.0, 1.0);
    RGBColor(
        (red * 255.0).round() as u8,
        (green * 255.0).round() as u8,
        (blue * 255.0).round() as u8,
    )
}
