//! Error handling module for llc-cutter

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::PlanError;

/// Main error type for llc-cutter operations
#[derive(Error, Debug)]
pub enum CutterError {
    /// Project file declares a format version this tool does not read
    #[error("Unsupported project version: {found:?} (expected {expected})")]
    UnsupportedVersion { found: Option<u32>, expected: u32 },

    /// Source media named by the project does not exist
    #[error("Source media not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// Project file could not be read or parsed
    #[error("Failed to parse project file {}: {message}", path.display())]
    ProjectParse { path: PathBuf, message: String },

    /// Invalid configuration value or unreadable configuration file
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Required external tool is not installed
    #[error("Tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// Media inspection failed
    #[error("Failed to probe media file: {message}")]
    Probe { message: String },

    /// An ffmpeg command exited unsuccessfully
    #[error("Command failed: {command}: {message}")]
    CommandFailed { command: String, message: String },

    /// Cut could not be planned
    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CutterError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a probe error
    pub fn probe(message: impl Into<String>) -> Self {
        Self::Probe {
            message: message.into(),
        }
    }

    /// Create a command failure error
    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for llc-cutter operations
pub type CutterResult<T> = std::result::Result<T, CutterError>;
