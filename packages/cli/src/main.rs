#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the vessel-watch density toolchain.
//!
//! `compare` flags grid cells whose density changed anomalously between a
//! baseline and a current snapshot; `render` draws one density table as a
//! color-mapped scatter map.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use vessel_watch_compare::{anomaly_count, compare_cells, summary, top_by_score};
use vessel_watch_density::ingest::{dedupe_max, read_density_csv};
use vessel_watch_density::output::write_comparison_csv;
use vessel_watch_density_models::{
    CompareParams, DEFAULT_EPS, DEFAULT_MIN_CURRENT_DENSITY, DEFAULT_RATIO_THRESH,
};

/// Rows shown in the console summary.
const TOP_ROWS: usize = 10;

#[derive(Parser)]
#[command(
    name = "vessel_watch_cli",
    about = "Cell-level anomaly detection for vessel density maps"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a baseline density snapshot against a current one and flag
    /// anomalous cells
    Compare {
        /// Baseline density CSV (historical period)
        baseline_csv: PathBuf,
        /// Current density CSV (target period)
        current_csv: PathBuf,
        /// Output CSV with anomaly scores and flags
        output_csv: PathBuf,
        /// Minimum ratio current/baseline to flag an anomaly
        #[arg(long, default_value_t = DEFAULT_RATIO_THRESH)]
        ratio_thresh: f64,
        /// Minimum current density to consider (hours for `time_at_cells`)
        #[arg(long, default_value_t = DEFAULT_MIN_CURRENT_DENSITY)]
        min_current_density: f64,
        /// Small epsilon to avoid divide-by-zero when baseline is ~0
        #[arg(long, default_value_t = DEFAULT_EPS)]
        eps: f64,
    },
    /// Render a density CSV as a color-mapped scatter map
    Render {
        /// Density CSV to draw
        input_csv: PathBuf,
        /// Output image path
        #[arg(long, default_value = "density_map.png")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            baseline_csv,
            current_csv,
            output_csv,
            ratio_thresh,
            min_current_density,
            eps,
        } => {
            let params = CompareParams {
                ratio_thresh,
                min_current_density,
                eps,
            };
            run_compare(&baseline_csv, &current_csv, &output_csv, &params)?;
        }
        Commands::Render { input_csv, output } => run_render(&input_csv, &output)?,
    }

    Ok(())
}

fn run_compare(
    baseline_csv: &Path,
    current_csv: &Path,
    output_csv: &Path,
    params: &CompareParams,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!(
        "Comparing {} against baseline {}",
        current_csv.display(),
        baseline_csv.display()
    );

    let baseline = read_density_csv(baseline_csv)?;
    let current = read_density_csv(current_csv)?;

    let records = compare_cells(baseline, current, params);
    write_comparison_csv(output_csv, &records)?;

    println!("Saved: {}", output_csv.display());
    println!("Total anomalies: {}", anomaly_count(&records));
    println!("Top {TOP_ROWS} by score:");
    print!("{}", summary::render_table(&top_by_score(&records, TOP_ROWS)));

    Ok(())
}

fn run_render(input_csv: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let cells = dedupe_max(read_density_csv(input_csv)?);

    println!("Loaded {} unique grid cells", cells.len());
    if let Some((min, max)) = vessel_watch_render::density_range(&cells) {
        println!("Density range: {min:.4} to {max:.4}");
    }

    vessel_watch_render::render_density_map(&cells, output, "Vessel Density - Time at Cells")?;
    println!("Saved visualization to {}", output.display());

    Ok(())
}
