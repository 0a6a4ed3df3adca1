//! boardscan CLI: slice a chessboard photo into squares, encode placements.

use boardscan::board::{BoardScanner, BOARD_NOT_DETECTED};
use boardscan::io::{load_rgb, save_squares, ScanConfig, ScanReport};
use boardscan::placement_from_codes;
use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "boardscan")]
#[command(about = "Find a chessboard in a photo and cut it into 64 named squares")]
#[command(version)]
struct Cli {
    /// Log stage details at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the board and write one PNG per square plus a JSON report.
    Scan(ScanArgs),

    /// Encode a `{ "a1": "wR", ... }` label map as a FEN placement.
    Fen {
        /// JSON file mapping all 64 squares to label codes.
        labels: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct ScanArgs {
    /// Input photo. Overrides `image_path` from --config.
    image: Option<PathBuf>,

    /// JSON scan config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the square patches.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Path of the JSON report.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Skip the light/dark alternation check.
    #[arg(long)]
    no_validate: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match &cli.command {
        Commands::Scan(args) => run_scan(args),
        Commands::Fen { labels } => run_fen(labels),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init_with_filter(level);
        boardscan::core::init_tracing(if verbose { "debug" } else { "info" }, false);
    }

    #[cfg(not(feature = "tracing"))]
    {
        let _ = boardscan::core::init_with_level(level);
    }
}

fn resolve_config(args: &ScanArgs) -> CliResult<ScanConfig> {
    let mut cfg = match &args.config {
        Some(path) => ScanConfig::load_json(path)?,
        None => {
            let image = args
                .image
                .as_ref()
                .ok_or("an image path or --config is required")?;
            ScanConfig {
                image_path: image.display().to_string(),
                output_dir: None,
                report_path: None,
                params: None,
            }
        }
    };
    if let Some(image) = &args.image {
        cfg.image_path = image.display().to_string();
    }
    if let Some(dir) = &args.out_dir {
        cfg.output_dir = Some(dir.display().to_string());
    }
    if let Some(report) = &args.report {
        cfg.report_path = Some(report.display().to_string());
    }
    Ok(cfg)
}

fn run_scan(args: &ScanArgs) -> CliResult<()> {
    let cfg = resolve_config(args)?;
    let mut params = cfg.build_params();
    if args.no_validate {
        params.validate = false;
    }

    let photo = load_rgb(&cfg.image_path)?;
    info!(
        "scanning {} ({}x{})",
        cfg.image_path,
        photo.width(),
        photo.height()
    );

    let outcome = BoardScanner::new(params).scan(&photo);
    let mut report = ScanReport::new(Some(cfg.image_path.clone()), &photo);
    report.record(&outcome);
    let report_path = cfg.report_path();

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            info!("scan failed: {e}");
            report.write_json(&report_path)?;
            return Err(BOARD_NOT_DETECTED.into());
        }
    };

    let out_dir = cfg
        .output_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("squares"));
    let written = save_squares(&result.squares, &out_dir)?;
    report.squares = written.iter().map(|p| p.display().to_string()).collect();
    report.write_json(&report_path)?;

    println!(
        "wrote {} squares to {} and report to {}",
        written.len(),
        out_dir.display(),
        report_path.display()
    );
    Ok(())
}

fn run_fen(labels: &Path) -> CliResult<()> {
    let raw = fs::read_to_string(labels)?;
    let map: BTreeMap<String, String> = serde_json::from_str(&raw)?;
    println!("{}", placement_from_codes(map)?);
    Ok(())
}
