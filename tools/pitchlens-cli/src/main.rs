//! PitchLens CLI: command-line interface for match-footage analysis.
//!
//! Usage:
//!   pitchlens analyze <VIDEO>   Analyze a clip and emit a JSON report
//!   pitchlens score             Aggregate stat tables into a weighted score
//!   pitchlens probe <VIDEO>     Show video dimensions, frame rate and length
//!   pitchlens check             Check for the external decoding tools

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pitchlens_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "pitchlens",
    about = "Motion, posture and stat analytics for soccer footage",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a video file or image-sequence directory
    Analyze(AnalyzeArgs),

    /// Aggregate stat tables without analyzing video
    Score {
        /// Playing position: forward, midfielder or defender
        #[arg(short, long)]
        position: String,

        /// Stat table JSON files; the first is the primary source
        #[arg(short, long = "stats", required = true)]
        stats: Vec<PathBuf>,
    },

    /// Show video information
    Probe {
        /// Video file or image-sequence directory
        video: PathBuf,
    },

    /// Check system capabilities
    Check,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Video file or image-sequence directory
    pub video: PathBuf,

    /// Playing position: forward, midfielder or defender
    #[arg(short, long)]
    pub position: String,

    /// Process every Nth frame
    #[arg(long)]
    pub stride: Option<usize>,

    /// Stat table JSON files; the first is the primary source
    #[arg(short, long = "stats")]
    pub stats: Vec<PathBuf>,

    /// Pose landmarks (JSON Lines) exported by a pose tool
    #[arg(short, long)]
    pub landmarks: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Brightness threshold for ball detection (0-255)
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Use the high-glare detection threshold
    #[arg(long, conflicts_with = "threshold")]
    pub high_glare: bool,

    /// Minimum blob area in pixels
    #[arg(long)]
    pub min_area: Option<usize>,

    /// Event policy: one-way or toggle
    #[arg(long)]
    pub event_policy: Option<String>,

    /// Landmark tracked for events and zones (e.g. left_hip)
    #[arg(long)]
    pub tracked_joint: Option<String>,

    /// Frame rate for image-sequence input
    #[arg(long)]
    pub fps: Option<f64>,

    /// Discard landmarks reported below this visibility (0.0-1.0)
    #[arg(long)]
    pub min_visibility: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_warning) = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    pitchlens_common::logging::init_logging(&logging);
    if let Some(warning) = config_warning {
        tracing::warn!("{warning}");
    }

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args, &config.analysis).await,
        Commands::Score { position, stats } => commands::score::run(&position, &stats),
        Commands::Probe { video } => commands::probe::run(&video),
        Commands::Check => commands::check::run(),
    }
}
