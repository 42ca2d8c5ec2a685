//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Version-aware Sonarr/Radarr poller
#[derive(Parser, Debug)]
#[command(name = "arrpoll")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true, default_value = "arrpoll.yaml")]
    pub config: PathBuf,

    /// Output format for command reports
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll every enabled operation on its interval until Ctrl-C
    Run,

    /// Run every enabled operation once
    Once {
        /// Print points as JSON lines instead of writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Resolve and print the API version of every configured server
    Detect,

    /// Load and validate the configuration
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Indented JSON
    Pretty,
}
