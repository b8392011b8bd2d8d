//! llc-cut: lossless segment cutter for LosslessCut projects
//!
//! # Usage
//!
//! ```bash
//! llc-cut holiday-proj.llc
//! llc-cut holiday-proj.llc --dry-run --log-level debug
//! llc-cut holiday-proj.llc --config cutter.toml --sequential
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use llc_cutter::adapters::init_logging;
use llc_cutter::cli::{commands, Cli};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.log_json)?;
    info!("Starting llc-cut {}", env!("CARGO_PKG_VERSION"));

    commands::cut(&cli.cut).await
}
