//! CLI module
//!
//! Command-line interface for the poller.
//!
//! # Commands
//!
//! - `run` - Poll on the configured intervals until Ctrl-C
//! - `once` - Run every enabled operation once (`--dry-run` prints points)
//! - `detect` - Resolve and print each server's API version
//! - `validate` - Load and validate the configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
