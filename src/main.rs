//! VHI Lab - Vegetation Health Index dashboard & interactive harmonic signal viewer
//!
//! `fetch` downloads the raw per-province files, `prepare` consolidates them
//! into one dataset, and `gui` (the default) opens the desktop window.

mod charts;
mod config;
mod dashboard;
mod data;
mod gui;
mod signal;
mod stats;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use data::{observations_to_frame, DataProcessor, DuplicatePolicy, ProvinceFetcher, RawCsvIngester};
use eframe::egui;
use gui::VhiLabApp;
use signal::SignalSession;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vhi_lab", version, about)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the dashboard and signal viewer
    Gui {
        /// Consolidated dataset to load on start
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Download the raw per-province CSV files
    Fetch {
        /// Target directory (defaults to the configured raw directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Clean, merge and remap the raw files into one dataset
    Prepare {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overrides the configured duplicate policy
        #[arg(long, value_enum)]
        duplicates: Option<DuplicatesArg>,
    },
}

/// Command-line spelling of `DuplicatePolicy`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DuplicatesArg {
    KeepAll,
    KeepFirst,
    KeepLast,
}

impl From<DuplicatesArg> for DuplicatePolicy {
    fn from(arg: DuplicatesArg) -> Self {
        match arg {
            DuplicatesArg::KeepAll => DuplicatePolicy::KeepAll,
            DuplicatesArg::KeepFirst => DuplicatePolicy::KeepFirst,
            DuplicatesArg::KeepLast => DuplicatePolicy::KeepLast,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Gui { dataset: None }) {
        Command::Gui { dataset } => run_gui(dataset.unwrap_or(config.dataset_path)),
        Command::Fetch { output } => {
            let dir = output.unwrap_or(config.raw_dir);
            let fetcher = ProvinceFetcher::new(config.fetch)?;
            let written = fetcher
                .fetch_all(&dir)
                .with_context(|| format!("Download into {} failed", dir.display()))?;
            log::info!("{} files saved to {}", written.len(), dir.display());
            Ok(())
        }
        Command::Prepare {
            input,
            output,
            duplicates,
        } => prepare(
            input.unwrap_or(config.raw_dir),
            output.unwrap_or(config.dataset_path),
            duplicates.map_or(config.duplicates, DuplicatePolicy::from),
        ),
    }
}

/// Ingest the raw directory, remap region ids and write the dataset.
fn prepare(input: PathBuf, output: PathBuf, duplicates: DuplicatePolicy) -> anyhow::Result<()> {
    let ingester = RawCsvIngester::new(duplicates)?;
    let rows = ingester
        .load_directory(&input)
        .with_context(|| format!("Cannot ingest {}", input.display()))?;

    let frame = observations_to_frame(&rows)?;
    let frame = DataProcessor::remap_region_ids(&frame)?;
    DataProcessor::write_dataset(&frame, &output)
        .with_context(|| format!("Cannot write {}", output.display()))?;

    log::info!("Dataset with {} rows written to {}", frame.height(), output.display());
    Ok(())
}

fn run_gui(dataset: PathBuf) -> anyhow::Result<()> {
    let session = SignalSession::new()?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("VHI Lab"),
        ..Default::default()
    };

    eframe::run_native(
        "VHI Lab",
        options,
        Box::new(move |cc| Ok(Box::new(VhiLabApp::new(cc, session, Some(dataset))))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}
