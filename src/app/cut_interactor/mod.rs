// Cut interactor - Orchestrates cutting every labeled segment of a project

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::adapters::toml_config::CutterConfig;
use crate::domain::model::Timestamp;
use crate::engine::command::MediaCommand;
use crate::engine::trimmer::{TrimPlan, Trimmer};
use crate::error::{CutterError, CutterResult};
use crate::output::SegmentVerifier;
use crate::ports::{ExecutePort, ProbePort};
use crate::project::LlcProject;
use crate::utils::path::{project_dir, segment_file_name};
use crate::utils::time::format_clock;

/// Directory, beside the project file, receiving the cut segments
pub const OUTPUT_DIR: &str = "cuts";

/// A labeled segment that could not be produced
#[derive(Debug, Serialize)]
pub struct SegmentFailure {
    /// Position in `cutSegments`
    pub index: usize,
    pub label: String,
    pub error: String,
}

/// Outcome of cutting one project
#[derive(Debug, Default, Serialize)]
pub struct CutReport {
    /// Files written (or, in a dry run, that would be written)
    pub produced: Vec<PathBuf>,
    /// Segments without a label
    pub skipped: usize,
    pub failures: Vec<SegmentFailure>,
}

impl CutReport {
    /// True when every labeled segment was produced
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Interactor for the project cutting use case
pub struct CutInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    config: CutterConfig,
    dry_run: bool,
}

impl CutInteractor {
    /// Create new cut interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        config: CutterConfig,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            config,
            dry_run: false,
        }
    }

    /// Plan and log every command without running any
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Cut every labeled segment of `project_file` into the `cuts` directory.
    ///
    /// Project-level problems (unreadable file, unsupported version, missing
    /// media, failed probe) are returned as errors. Segment-level problems
    /// are logged and collected in the report; the remaining segments still
    /// run. Temporary files are removed before returning.
    pub async fn cut_project(&self, project_file: &Path) -> CutterResult<CutReport> {
        info!("Loading project {}", project_file.display());
        let project = LlcProject::load(project_file)?;

        let media = project.media_path(project_file);
        if !media.is_file() {
            return Err(CutterError::SourceNotFound { path: media });
        }

        let output_dir = project_dir(project_file).join(OUTPUT_DIR);
        tokio::fs::create_dir_all(&output_dir).await?;

        let mut trimmer = Trimmer::open(
            self.probe_port.as_ref(),
            &media,
            &output_dir,
            self.config.trim_settings(),
        )
        .await?;

        let mut report = CutReport::default();
        for (index, segment) in project.cut_segments.iter().enumerate() {
            let Some(label) = segment.label() else {
                debug!("Skipping segment {} without a label", index);
                report.skipped += 1;
                continue;
            };

            let start = segment.start_or_zero();
            let end = segment.end_or(trimmer.profile().duration);
            let output = output_dir.join(segment_file_name(
                index,
                label,
                &self.config.output_extension,
            ));

            info!(
                "Cutting segment {} '{}' ({} - {})",
                index,
                label,
                format_clock(start),
                format_clock(end)
            );

            match self.cut_segment(&mut trimmer, start, end, &output).await {
                Ok(()) => report.produced.push(output),
                Err(e) => {
                    error!("Segment {} '{}' failed: {}", index, label, e);
                    report.failures.push(SegmentFailure {
                        index,
                        label: label.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        trimmer.clean_temp();

        info!(
            "Done: {} produced, {} failed, {} skipped",
            report.produced.len(),
            report.failures.len(),
            report.skipped
        );
        Ok(report)
    }

    async fn cut_segment(
        &self,
        trimmer: &mut Trimmer,
        start: Timestamp,
        end: Timestamp,
        output: &Path,
    ) -> CutterResult<()> {
        let plan = trimmer.generate_trim(start, end)?;
        for part in &plan.parts {
            debug!("  {} -> {}", part.range, part.path.display());
        }
        let merge = trimmer.generate_merge(&plan.parts, output)?;

        if self.dry_run {
            for command in plan.commands().chain(std::iter::once(&merge)) {
                info!("Would run: {}", command.to_shell_line());
            }
            return Ok(());
        }

        let attempts = self.config.retries + 1;
        for attempt in 1..=attempts {
            match self.execute_plan(&plan, &merge).await {
                Ok(()) => break,
                Err(e) if attempt < attempts => {
                    warn!("Attempt {}/{} failed: {}", attempt, attempts, e);
                }
                Err(e) => return Err(e),
            }
        }

        if self.config.verify_output {
            let verifier = SegmentVerifier::new(
                self.probe_port.as_ref(),
                self.config.verify_tolerance,
            );
            if let Err(e) = verifier.verify(output, end - start).await {
                warn!("Could not verify {}: {}", output.display(), e);
            }
        }

        Ok(())
    }

    /// Copies, then re-encodes, then the merge
    async fn execute_plan(&self, plan: &TrimPlan, merge: &MediaCommand) -> CutterResult<()> {
        self.run_all(plan.copy_commands.clone()).await?;

        let reencodes = if self.config.merge_reencodes {
            MediaCommand::merge(plan.reencode_commands.clone())
        } else {
            plan.reencode_commands.clone()
        };
        self.run_all(reencodes).await?;

        self.execute_port.run(merge).await
    }

    /// Run independent commands; an empty set is a no-op.
    ///
    /// Every started command is awaited even after a failure, and the first
    /// failure is returned.
    async fn run_all(&self, commands: Vec<MediaCommand>) -> CutterResult<()> {
        if commands.is_empty() {
            return Ok(());
        }

        if !self.config.parallel || commands.len() == 1 {
            for command in &commands {
                self.execute_port.run(command).await?;
            }
            return Ok(());
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_jobs));
        let mut tasks = JoinSet::new();
        for command in commands {
            let executor = Arc::clone(&self.execute_port);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|e| {
                    CutterError::command_failed(command.to_shell_line(), e.to_string())
                })?;
                executor.run(&command).await
            });
        }

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let result = joined.unwrap_or_else(|e| {
                Err(CutterError::command_failed("ffmpeg task", e.to_string()))
            });
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
