//! Pacing CLI - pace command

use anyhow::Result;
use clap::{Parser, Subcommand};
use pacing_cli::Mode;
use std::path::PathBuf;

mod cmd;

/// Pace - replay call traces through debounce and throttle wrappers
#[derive(Parser)]
#[command(name = "pace")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay calls at the given offsets and show which ones executed
    Simulate {
        /// Primitive to replay through
        #[arg(long, value_enum)]
        mode: Mode,
        /// Delay (debounce) or window (throttle) in ms, overrides the config
        #[arg(long, allow_negative_numbers = true)]
        delay_ms: Option<i64>,
        /// Call offsets in ms, comma separated (e.g. 0,50,120,310)
        #[arg(long, value_delimiter = ',', required = true)]
        at: Vec<u64>,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = cmd::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate { mode, delay_ms, at } => {
            cmd::simulate::run(&config, mode, delay_ms, &at).await
        }
        Commands::Config => cmd::config::run(&config, cli.config.as_deref()),
    }
}
