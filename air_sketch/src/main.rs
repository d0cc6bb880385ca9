//! air_sketch — interactive entry point.

use std::path::PathBuf;

use air_sketch::{run, AppConfig, Mode, SourceConfig};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Draw,
    Erase,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Draw  => Mode::Draw,
            ModeArg::Erase => Mode::Erase,
        }
    }
}

/// Draw in the air with your index finger.
#[derive(Debug, Parser)]
#[command(name = "air_sketch", version, about)]
struct Cli {
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: usize,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 720)]
    height: usize,

    /// Initial pen mode.
    #[arg(long, value_enum, default_value_t = ModeArg::Draw)]
    mode: ModeArg,

    /// Pose-engine command streaming JSON landmark lines (split on
    /// whitespace, not run through a shell).
    #[arg(long, conflicts_with = "replay")]
    tracker: Option<String>,

    /// Replay landmark lines from a file.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Drawing-classifier command (JSON lines over stdin/stdout; split on
    /// whitespace, not run through a shell).
    #[arg(long)]
    classifier: Option<String>,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let source = match (self.tracker, self.replay) {
            (Some(cmd), _)     => SourceConfig::Tracker(cmd),
            (None, Some(path)) => SourceConfig::Replay(path),
            (None, None)       => SourceConfig::Simulated,
        };
        AppConfig {
            width:      self.width.max(1),
            height:     self.height.max(1),
            mode:       self.mode.into(),
            source,
            classifier: self.classifier,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("air_sketch=info")),
        )
        .init();

    let cfg = Cli::parse().into_config();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Air Sketch — draw with your finger              ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match &cfg.source {
        SourceConfig::Simulated     => println!("  Source: mouse simulation (hold left button to draw)"),
        SourceConfig::Tracker(cmd)  => println!("  Source: tracker `{cmd}`"),
        SourceConfig::Replay(path)  => println!("  Source: replay {}", path.display()),
    }
    println!();

    run(cfg)
}
