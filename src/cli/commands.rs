//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod engines;
mod helpers;
mod init;
mod submit;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "smark")]
#[command(about = "Turn keyword bookmarks into search engines")]
#[command(version)]
pub struct Cli {
    /// Data directory
    #[arg(short, long, global = true, env = "SEARCHMARKS_DATA_DIR")]
    data_dir: Option<PathBuf>,

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
    /// Initialize the data directory with a starter config and bookmarks file
    Init,

    /// List the resolved search engines
    Engines {
        /// Resolve this tag instead of the configured one
        #[arg(short, long)]
        tag: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a search submission with an engine
    Submit {
        /// Engine keyword or name
        engine: String,

        /// Search terms
        #[arg(required = true)]
        terms: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the bookmarks file for keyword search problems
    Check {
        /// Check this tag instead of the configured one
        #[arg(short, long)]
        tag: Option<String>,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.data_dir).await?;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Engines { tag, json } => {
            engines::cmd_engines(&settings, tag.as_deref(), json).await
        }
        Commands::Submit {
            engine,
            terms,
            json,
        } => submit::cmd_submit(&settings, &engine, &terms, json).await,
        Commands::Check { tag } => check::cmd_check(&settings, tag.as_deref()).await,
    }
}
