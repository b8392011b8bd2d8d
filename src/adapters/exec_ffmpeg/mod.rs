//! FFmpeg execution adapter
//!
//! Runs planned [`MediaCommand`]s as ffmpeg child processes.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::engine::command::MediaCommand;
use crate::error::{CutterError, CutterResult};
use crate::ports::ExecutePort;

/// Number of trailing stderr lines kept in failure diagnostics
const STDERR_TAIL_LINES: usize = 12;

/// FFmpeg-based execution adapter
#[derive(Debug, Default)]
pub struct FFmpegExecutor;

impl FFmpegExecutor {
    /// Create new FFmpeg executor
    pub fn new() -> Self {
        Self
    }

    async fn write_staged_files(command: &MediaCommand) -> CutterResult<()> {
        for staged in command.staged_files() {
            debug!("Writing {}", staged.path.display());
            tokio::fs::write(&staged.path, staged.contents.as_bytes()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ExecutePort for FFmpegExecutor {
    async fn run(&self, command: &MediaCommand) -> CutterResult<()> {
        Self::write_staged_files(command).await?;

        let line = command.to_shell_line();
        info!("Running: {}", line);

        let output = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CutterError::ToolNotFound {
                        tool: command.program().display().to_string(),
                    }
                } else {
                    CutterError::command_failed(&line, format!("failed to spawn: {}", e))
                }
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = format!("{} ({})", stderr_tail(&stderr), output.status);
        Err(CutterError::command_failed(line, message))
    }
}

/// Last non-empty stderr lines, joined
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect();
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join("\n")
}
