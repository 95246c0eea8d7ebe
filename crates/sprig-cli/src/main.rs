//! Sprig CLI - run and check room files headlessly

mod commands;
mod demo;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, run};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sprig")]
#[command(about = "Fixed-timestep room runner", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a room for a number of frames and print a summary
    Run {
        /// Path to room file
        room: String,

        /// Frames to deliver
        #[arg(long, default_value = "300")]
        frames: u32,

        /// Milliseconds between frames
        #[arg(long, default_value = "16.667")]
        frame_ms: f64,

        /// Cap on fixed updates per frame (overrides the room file)
        #[arg(long)]
        max_updates: Option<u32>,
    },

    /// Validate a room file against the demo object library
    Check {
        /// Path to room file
        room: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Run {
            room,
            frames,
            frame_ms,
            max_updates,
        } => run::run(run::RunArgs {
            room,
            frames,
            frame_ms,
            max_updates,
        }),
        Commands::Check { room } => check::run(&room),
    }
}
