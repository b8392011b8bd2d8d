//! LosslessCut project files
//!
//! LosslessCut saves projects as JSON5:
//!
//! ```json5
//! {
//!   version: 1,
//!   mediaFileName: 'holiday.mp4',
//!   cutSegments: [
//!     { start: 1.25, end: 17.5, name: 'Arrival' },
//!     { start: 40, name: 'Rest of the day' },
//!   ],
//! }
//! ```
//!
//! Timestamps are read straight into exact decimals.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::model::Timestamp;
use crate::error::{CutterError, CutterResult};
use crate::utils::path::resolve_beside;

/// The only project format version understood
pub const SUPPORTED_VERSION: u32 = 1;

/// A parsed LosslessCut project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlcProject {
    /// Project format version
    #[serde(default)]
    pub version: Option<u32>,
    /// Source media, relative to the project file
    pub media_file_name: String,
    /// Segments in timeline order
    #[serde(default)]
    pub cut_segments: Vec<CutSegment>,
}

/// One segment of a project
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutSegment {
    #[serde(default)]
    pub start: Option<Decimal>,
    #[serde(default)]
    pub end: Option<Decimal>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CutSegment {
    /// Trimmed label, `None` when missing or blank
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Start time, zero when omitted
    pub fn start_or_zero(&self) -> Timestamp {
        self.start.unwrap_or(Decimal::ZERO)
    }

    /// End time, `duration` when omitted
    pub fn end_or(&self, duration: Timestamp) -> Timestamp {
        self.end.unwrap_or(duration)
    }
}

impl LlcProject {
    /// Parse project text
    pub fn parse(path: &Path, text: &str) -> CutterResult<Self> {
        json5::from_str(text).map_err(|e| CutterError::ProjectParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read, parse and validate a project file
    pub fn load(path: &Path) -> CutterResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CutterError::ProjectParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let project = Self::parse(path, &text)?;
        project.validate()?;
        Ok(project)
    }

    /// Reject unsupported format versions
    pub fn validate(&self) -> CutterResult<()> {
        if self.version != Some(SUPPORTED_VERSION) {
            return Err(CutterError::UnsupportedVersion {
                found: self.version,
                expected: SUPPORTED_VERSION,
            });
        }
        Ok(())
    }

    /// Source media path resolved against the project file's directory
    pub fn media_path(&self, project_file: &Path) -> PathBuf {
        resolve_beside(project_file, &self.media_file_name)
    }
}
