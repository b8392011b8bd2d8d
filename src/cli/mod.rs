//! CLI module for llc-cutter
//!
//! This module handles command-line argument parsing and command execution.

use clap::Parser;

pub mod args;
pub mod commands;

/// Cut the labeled segments of a LosslessCut project into separate files
///
/// Each segment is stream-copied between keyframes and re-encoded only at
/// its unaligned edges, then joined losslessly into `cuts/<NN> <label>.<ext>`
/// beside the project file.
#[derive(Parser, Debug)]
#[command(name = "llc-cut")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (ignored when RUST_LOG is set)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(flatten)]
    pub cut: args::CutArgs,
}
