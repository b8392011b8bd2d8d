//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::adapters::toml_config::CliOverrides;

/// Arguments for cutting a project
#[derive(Args, Debug)]
pub struct CutArgs {
    /// LosslessCut project file (.llc)
    pub project: PathBuf,

    /// TOML configuration file (default: llc-cutter.toml beside the project)
    #[arg(short, long, env = "LLC_CUTTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Plan and print every ffmpeg command without running any
    #[arg(long)]
    pub dry_run: bool,

    /// Run part commands one at a time
    #[arg(long)]
    pub sequential: bool,
}

impl CutArgs {
    /// Configuration overrides carried by these arguments
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            sequential: self.sequential,
        }
    }
}
