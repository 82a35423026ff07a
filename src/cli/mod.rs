//! Developer CLI for probing the acquisition engine.

mod fetch;
mod locate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use problem_acquire::EngineConfig;

#[derive(Parser)]
#[command(name = "problem-acquire")]
#[command(about = "Fetch normalized problem details from problem-page URLs")]
#[command(version)]
pub struct Cli {
    /// Config file path (TOML)
    #[arg(short, long, global = true, env = "PROBLEM_ACQUIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch problem details through the cache, queue and strategy chain
    Fetch {
        /// Problem page URLs
        #[arg(required = true)]
        urls: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the identity parsed from a problem URL
    Locate {
        /// Problem page URL
        url: String,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch { urls, json } => {
            let config = EngineConfig::load(cli.config.as_deref())?;
            fetch::cmd_fetch(&config, &urls, json).await
        }
        Commands::Locate { url } => locate::cmd_locate(&url),
    }
}
