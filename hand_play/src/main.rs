//! hand_play — command-line entry point.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use hand_gesture::GripRule;
use hand_play::app::{self, Mode};
use hand_play::config::{AppConfig, Overrides};

/// Hand-gesture counter and box game
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: ModeArg,

    /// TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Replay recorded JSON-lines landmarks ("-" for stdin)
    #[arg(long, global = true, value_name = "FILE", conflicts_with = "detector")]
    replay: Option<PathBuf>,

    /// Run a detector command and read JSON-lines landmarks from its stdout
    #[arg(long, global = true, value_name = "CMD")]
    detector: Option<String>,

    /// Mirror landmarks horizontally (selfie view)
    #[arg(long, global = true)]
    mirror: bool,

    /// How an open hand is told from a closed one
    #[arg(long, global = true, value_enum)]
    grip: Option<GripArg>,

    /// Thumb-to-index distance in pixels below which a pinch counts as closed
    #[arg(long, global = true, value_name = "PX", default_value_t = GripRule::DEFAULT_PINCH_PX)]
    pinch_threshold: f32,

    /// Render rate
    #[arg(long, global = true)]
    fps: Option<u32>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum ModeArg {
    /// Count fists in the left and right halves of the frame
    Counter,
    /// Drag boxes around with a closed hand
    Boxes,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum GripArg {
    /// All four fingertips folded below their middle joints
    Fold,
    /// Thumb tip touching the index tip
    Pinch,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let overrides = Overrides {
        replay:   cli.replay,
        detector: cli.detector,
        mirror:   cli.mirror,
        grip:     cli.grip.map(|g| match g {
            GripArg::Fold  => GripRule::Fold,
            GripArg::Pinch => GripRule::Pinch { threshold_px: cli.pinch_threshold },
        }),
        fps:      cli.fps,
    };
    let cfg = AppConfig::load(cli.config.as_deref(), &overrides)?;

    let mode = match cli.mode {
        ModeArg::Counter => Mode::Counter,
        ModeArg::Boxes   => Mode::Boxes,
    };
    log::info!("Starting {:?} mode", mode);
    app::run(mode, &cfg)
}
