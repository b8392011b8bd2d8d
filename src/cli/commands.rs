//! Command implementations

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::adapters::{resolve_tool, CutterConfig, FFmpegExecutor, FFprobeAdapter};
use crate::app::{CutInteractor, CutReport};
use crate::cli::args::CutArgs;
use crate::utils::path::project_dir;

/// Exit code when at least one labeled segment could not be produced
pub const EXIT_SEGMENTS_FAILED: u8 = 2;

/// Execute the cut command
pub async fn cut(args: &CutArgs) -> Result<ExitCode> {
    let project = &args.project;
    if !project.is_file() {
        anyhow::bail!("Project file does not exist: {}", project.display());
    }

    let mut config = CutterConfig::load(
        args.config.as_deref(),
        &project_dir(project),
        &args.overrides(),
    )
    .context("Failed to load configuration")?;

    config.ffmpeg = resolve_tool(&config.ffmpeg).context("ffmpeg is required")?;
    config.ffprobe = resolve_tool(&config.ffprobe).context("ffprobe is required")?;
    info!(
        "Using {} and {}",
        config.ffmpeg.display(),
        config.ffprobe.display()
    );

    let probe = Arc::new(FFprobeAdapter::new(config.ffprobe.clone()));
    let executor = Arc::new(FFmpegExecutor::new());
    let interactor = CutInteractor::new(probe, executor, config).with_dry_run(args.dry_run);

    let report = interactor
        .cut_project(project)
        .await
        .with_context(|| format!("Failed to cut {}", project.display()))?;

    print_report(&report);

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_SEGMENTS_FAILED))
    }
}

/// Summarise the run on stdout
fn print_report(report: &CutReport) {
    for path in &report.produced {
        println!("{}", path.display());
    }
    for failure in &report.failures {
        error!(
            "Segment {:02} '{}' was not produced: {}",
            failure.index, failure.label, failure.error
        );
    }
}
