// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::PlanError;

#[cfg(test)]
mod tests;

/// Media timestamp in seconds.
///
/// Exact decimal so keyframe positions read from the inspector compare equal
/// to cut points read from the project file.
pub type Timestamp = Decimal;

/// Ordered, strictly increasing keyframe timestamps of one source file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyframeSet {
    timestamps: Vec<Timestamp>,
}

impl KeyframeSet {
    /// Create a keyframe set, rejecting unordered, duplicate or negative entries
    pub fn new(timestamps: Vec<Timestamp>) -> Result<Self, PlanError> {
        if let Some(first) = timestamps.first() {
            if *first < Decimal::ZERO {
                return Err(PlanError::InvalidKeyframes(format!(
                    "negative keyframe timestamp {}",
                    first
                )));
            }
        }

        if let Some(pair) = timestamps.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PlanError::InvalidKeyframes(format!(
                "{} is not followed by a later keyframe (got {})",
                pair[0], pair[1]
            )));
        }

        Ok(Self { timestamps })
    }

    /// Create a keyframe set from timestamps in arbitrary order.
    ///
    /// Sorts, removes duplicates and drops negative timestamps (pre-roll
    /// packets some muxers emit before zero).
    pub fn from_unsorted(mut timestamps: Vec<Timestamp>) -> Self {
        timestamps.retain(|t| *t >= Decimal::ZERO);
        timestamps.sort();
        timestamps.dedup();
        Self { timestamps }
    }

    /// Keyframe timestamps in ascending order
    pub fn as_slice(&self) -> &[Timestamp] {
        &self.timestamps
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the set holds no keyframes
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Whether `at` is exactly a keyframe
    pub fn contains(&self, at: Timestamp) -> bool {
        self.timestamps.binary_search(&at).is_ok()
    }

    /// Smallest keyframe at or after `at`
    pub fn first_at_or_after(&self, at: Timestamp) -> Option<Timestamp> {
        let idx = self.timestamps.partition_point(|t| *t < at);
        self.timestamps.get(idx).copied()
    }

    /// Largest keyframe at or before `at`
    pub fn last_at_or_before(&self, at: Timestamp) -> Option<Timestamp> {
        let idx = self.timestamps.partition_point(|t| *t <= at);
        idx.checked_sub(1).map(|i| self.timestamps[i])
    }
}

/// Duration, keyframes and video codec of a source file, read once per project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaProfile {
    pub duration: Timestamp,
    pub keyframes: KeyframeSet,
    /// ffprobe `codec_name` of the first video stream (`h264`, `hevc`, ...)
    pub video_codec: Option<String>,
}

impl MediaProfile {
    /// Create a new media profile with an unknown video codec
    pub fn new(duration: Timestamp, keyframes: KeyframeSet) -> Self {
        Self {
            duration,
            keyframes,
            video_codec: None,
        }
    }

    /// Set the video codec
    pub fn with_video_codec(mut self, codec: Option<String>) -> Self {
        self.video_codec = codec;
        self
    }
}

/// A validated `[start, end)` cut request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutRequest {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl CutRequest {
    /// Validate a range against the media duration
    pub fn new(start: Timestamp, end: Timestamp, duration: Timestamp) -> Result<Self, PlanError> {
        if start == end {
            return Err(PlanError::EmptyRange { at: start });
        }
        if start > end {
            return Err(PlanError::InvertedRange { start, end });
        }
        if start < Decimal::ZERO || end > duration {
            return Err(PlanError::OutOfBounds {
                start,
                end,
                duration,
            });
        }

        Ok(Self { start, end })
    }

    /// Requested length in seconds
    pub fn duration(&self) -> Timestamp {
        self.end - self.start
    }
}

/// How a sub-range is extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Keyframe-aligned, extracted with stream copy
    Copy,
    /// Partial GOP, decoded and encoded again
    Reencode,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentKind::Copy => write!(f, "copy"),
            SegmentKind::Reencode => write!(f, "reencode"),
        }
    }
}

/// One contiguous piece of a cut request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRange {
    pub start: Timestamp,
    pub end: Timestamp,
    pub kind: SegmentKind,
}

impl SubRange {
    pub fn copy(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Copy,
        }
    }

    pub fn reencode(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Reencode,
        }
    }

    /// Length in seconds
    pub fn duration(&self) -> Timestamp {
        self.end - self.start
    }
}

impl fmt::Display for SubRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) {}", self.start, self.end, self.kind)
    }
}

/// Temporary file holding the media of exactly one sub-range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartFile {
    pub path: PathBuf,
    pub range: SubRange,
}

impl PartFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
