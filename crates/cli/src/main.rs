//! uhi - Urban heat island analysis from the command line

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use uhi_algorithms::classification::{vegetation_category, KmeansParams};
use uhi_algorithms::imagery::{brightness_temperature, emissivity, is_plausible_lst, lst, ndvi};
use uhi_algorithms::pipeline::{
    analyze, AnalysisClock, AnalysisRequest, FixedClock, PipelineConfig, SystemClock, UhiReport,
    MAX_LOOKBACK_DAYS, MAX_SAMPLE_COUNT, MIN_SAMPLE_COUNT,
};
use uhi_core::{BBox, ErrorKind, ImageryProvider};
use uhi_provider::{CatalogProvider, SyntheticProvider};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "uhi")]
#[command(author, version, about = "Urban heat island analysis", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a scene, cluster heat zones and print the JSON report
    Analyze {
        /// Number of points to sample
        #[arg(short = 'n', long, default_value_t = 100)]
        samples: usize,
        /// Days before the analysis date searched for imagery
        #[arg(short, long, default_value_t = 30)]
        days: u32,
        /// Analysis date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Clustering seed
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Number of heat zones
        #[arg(short = 'k', long, default_value_t = 3)]
        clusters: usize,
        /// K-means initializations
        #[arg(long, default_value_t = 10)]
        n_init: usize,
        /// K-means iteration cap
        #[arg(long, default_value_t = 300)]
        max_iter: usize,
        /// Scene catalog (JSON); uses the synthetic city scene when omitted
        #[arg(short, long)]
        catalog: Option<PathBuf>,
        /// Region as min_lon,min_lat,max_lon,max_lat
        #[arg(long, value_parser = parse_bbox)]
        bbox: Option<BBox>,
        /// Maximum scene cloud cover in percent
        #[arg(long, default_value_t = 20.0)]
        max_cloud: f64,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Evaluate the index formulas for one band triple
    Indices {
        /// Near-infrared reflectance
        #[arg(long)]
        nir: f64,
        /// Red reflectance
        #[arg(long)]
        red: f64,
        /// Thermal band radiance
        #[arg(long)]
        thermal: f64,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")
}

fn spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn parse_bbox(s: &str) -> std::result::Result<BBox, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid number in bbox: {e}"))?;
    if parts.len() != 4 {
        return Err(format!(
            "expected 4 comma-separated values, got {}",
            parts.len()
        ));
    }
    let bbox = BBox::new(parts[0], parts[1], parts[2], parts[3]);
    bbox.validate().map_err(|e| e.to_string())?;
    Ok(bbox)
}

/// Process status for a failed run.
fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Parameter => 2,
        ErrorKind::DataUnavailable => 3,
        ErrorKind::InsufficientData => 4,
        ErrorKind::Computation => 1,
    }
}

fn hint(err: &uhi_core::Error) -> Option<String> {
    match err {
        uhi_core::Error::InvalidParameter { name, .. } => parameter_hint(name),
        uhi_core::Error::DataUnavailable(_) => {
            Some("try a longer --days window or a higher --max-cloud".to_string())
        }
        uhi_core::Error::InsufficientData { .. } => {
            Some("request more samples or fewer --clusters".to_string())
        }
        _ => None,
    }
}

/// Which flag to change for an invalid parameter.
fn parameter_hint(name: &str) -> Option<String> {
    let h = match name {
        "sample_count" => format!("--samples must be {MIN_SAMPLE_COUNT}-{MAX_SAMPLE_COUNT}"),
        "lookback_days" => format!("--days must be 1-{MAX_LOOKBACK_DAYS}"),
        "k" => "--clusters must be at least 2".to_string(),
        "n_init" => "--n-init must be at least 1".to_string(),
        "max_iterations" => "--max-iter must be at least 1".to_string(),
        "max_cloud_cover" => "--max-cloud must be between 0 and 100".to_string(),
        "region" => "--bbox must be min_lon,min_lat,max_lon,max_lat with min < max".to_string(),
        _ => return None,
    };
    Some(h)
}

fn write_report(report: &UhiReport, output: Option<&PathBuf>, compact: bool) -> Result<()> {
    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };
    if compact {
        serde_json::to_writer(&mut out, report)?;
    } else {
        serde_json::to_writer_pretty(&mut out, report)?;
    }
    writeln!(out)?;
    out.flush().context("Failed to write report")?;
    if let Some(path) = output {
        println!("Report saved to: {}", path.display());
    }
    Ok(())
}

// ─── Commands ───────────────────────────────────────────────────────────

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            samples,
            days,
            date,
            seed,
            clusters,
            n_init,
            max_iter,
            catalog,
            bbox,
            max_cloud,
            output,
            compact,
        } => {
            let request = AnalysisRequest {
                sample_count: samples,
                lookback_days: days,
            };
            let config = PipelineConfig {
                region: bbox.unwrap_or_default(),
                max_cloud_cover: max_cloud,
                kmeans: KmeansParams {
                    k: clusters,
                    n_init,
                    max_iterations: max_iter,
                    seed,
                    ..Default::default()
                },
            };

            let clock: Box<dyn AnalysisClock> = match date {
                Some(d) => {
                    let midnight = d
                        .and_hms_opt(0, 0, 0)
                        .context("Invalid analysis date")?;
                    Box::new(FixedClock(Utc.from_utc_datetime(&midnight)))
                }
                None => Box::new(SystemClock),
            };

            let provider: Box<dyn ImageryProvider> = match catalog {
                Some(path) => Box::new(CatalogProvider::open(&path)?),
                None => Box::new(SyntheticProvider::new(seed)),
            };

            let pb = spinner(&format!("Analyzing with {}...", provider.name()))?;
            let start = Instant::now();
            let result = analyze(provider.as_ref(), &request, &config, clock.as_ref());
            pb.finish_and_clear();
            let report = result?;

            info!(
                "{} points in {} zones, processing time: {:.2?}",
                report.points.len(),
                report.zones.len(),
                start.elapsed()
            );
            write_report(&report, output.as_ref(), compact)?;
        }

        Commands::Indices { nir, red, thermal } => {
            let v = ndvi(nir, red);
            let bt = brightness_temperature(thermal);
            let t = lst(thermal, v);

            println!("NDVI: {:.4}", v);
            println!("Vegetation: {}", vegetation_category(v));
            println!("Emissivity: {:.5}", emissivity(v));
            println!("Brightness temperature: {:.2} °C", bt);
            println!("LST: {:.2} °C", t);
            let verdict = if t.is_finite() && is_plausible_lst(t) && (-1.0..=1.0).contains(&v) {
                "valid"
            } else {
                "invalid (would be dropped)"
            };
            println!("Sample: {}", verdict);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("warning: {e:#}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let core = err.downcast_ref::<uhi_core::Error>();
            let kind = core.map(|e| e.kind()).unwrap_or(ErrorKind::Computation);
            eprintln!("error ({}): {err:#}", kind.label());
            if let Some(h) = core.and_then(hint) {
                eprintln!("hint: {h}");
            }
            ExitCode::from(exit_code(kind))
        }
    }
}
