//! changemask CLI - before/after raster change detection

mod pipeline;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use changemask_algorithms::imagery::DEFAULT_THRESHOLD;
use changemask_core::io::load;
use pipeline::{ChangeSummary, PipelineConfig, DEFAULT_OUTPUT};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "changemask")]
#[command(author, version, about = "Detect added and removed features between two rasters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a before and after image and write an RGB change overlay
    Detect {
        /// Image at time T1 (.tif or .img)
        before: PathBuf,
        /// Image at time T2, same format and shape as BEFORE
        after: PathBuf,
        /// Output GeoTIFF (green = added, red = removed)
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Mean normalized band difference a pixel must exceed
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,
    },
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn done(summary: &ChangeSummary, elapsed: std::time::Duration) {
    let (bands, rows, cols) = summary.shape;
    println!("Change mask saved to: {}", summary.output.display());
    println!("  Input: {} x {} ({} bands)", cols, rows, bands);
    println!("  {}", summary);
    println!("  Processing time: {:.2?}", elapsed);
}

fn info(input: &Path) -> Result<()> {
    let pb = spinner("Reading raster...");
    let loaded = load(input).context("Failed to read raster");
    pb.finish_and_clear();
    let (raster, profile) = loaded?;

    let (bands, rows, cols) = raster.shape();
    let bounds = profile.bounds();

    println!("File: {}", input.display());
    println!("Format: {:?}", profile.format);
    println!("Dimensions: {} x {} ({} bands, {})", cols, rows, bands, profile.dtype);
    println!("Cell size: {}", profile.transform.cell_size());
    println!(
        "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
        bounds.0, bounds.1, bounds.2, bounds.3
    );
    if let Some(crs) = &profile.crs {
        println!("CRS: {}", crs);
    }
    if let Some(nodata) = profile.nodata {
        println!("NoData: {}", nodata);
    }

    println!("\nStatistics:");
    for (band, stats) in raster.band_statistics().iter().enumerate() {
        match (stats.min, stats.max, stats.mean) {
            (Some(min), Some(max), Some(mean)) => println!(
                "  Band {}: min {:.4}, max {:.4}, mean {:.4} ({} valid)",
                band + 1,
                min,
                max,
                mean,
                stats.valid_count
            ),
            _ => println!("  Band {}: no valid samples", band + 1),
        }
    }
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Detect {
            before,
            after,
            output,
            threshold,
        } => {
            let config = PipelineConfig {
                before,
                after,
                output,
                threshold,
            };

            let start = Instant::now();
            let pb = spinner("Detecting changes...");
            let result = pipeline::run(&config);
            pb.finish_and_clear();
            let summary = result.context("Change detection failed")?;
            done(&summary, start.elapsed());
        }
        Commands::Info { input } => info(&input)?,
    }

    Ok(())
}
