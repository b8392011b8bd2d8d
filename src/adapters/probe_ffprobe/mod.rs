//! FFprobe adapter for media file probing
//!
//! Reads the duration and the keyframe packet timestamps of a file with the
//! ffprobe command-line tool. Timestamps are parsed from ffprobe's decimal
//! strings straight into exact decimals.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::model::{KeyframeSet, Timestamp};
use crate::error::{CutterError, CutterResult};
use crate::ports::ProbePort;
use crate::utils::time::parse_seconds;

#[derive(Debug, Deserialize)]
struct DurationOutput {
    #[serde(default)]
    streams: Vec<StreamEntry>,
    format: Option<FormatEntry>,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    codec_type: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FormatEntry {
    duration: Option<String>,
    start_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PacketOutput {
    #[serde(default)]
    packets: Vec<PacketEntry>,
    format: Option<FormatEntry>,
}

#[derive(Debug, Deserialize)]
struct PacketEntry {
    pts_time: Option<String>,
    #[serde(default)]
    flags: String,
}

#[derive(Debug, Deserialize)]
struct CodecOutput {
    #[serde(default)]
    streams: Vec<CodecEntry>,
}

#[derive(Debug, Deserialize)]
struct CodecEntry {
    codec_name: Option<String>,
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    ffprobe: PathBuf,
}

impl FFprobeAdapter {
    /// Create a new adapter spawning `ffprobe`
    pub fn new(ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffprobe: ffprobe.into(),
        }
    }

    async fn run_json(&self, args: &[&str], file_path: &Path) -> CutterResult<String> {
        debug!(
            "Running {} {} {}",
            self.ffprobe.display(),
            args.join(" "),
            file_path.display()
        );

        let output = Command::new(&self.ffprobe)
            .args(args)
            .arg(file_path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CutterError::ToolNotFound {
                        tool: self.ffprobe.display().to_string(),
                    }
                } else {
                    CutterError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CutterError::probe(format!(
                "ffprobe failed on {}: {}",
                file_path.display(),
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| CutterError::probe(format!("Invalid UTF-8 in ffprobe output: {}", e)))
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_duration(&self, file_path: &Path) -> CutterResult<Timestamp> {
        let json = self
            .run_json(
                &[
                    "-v",
                    "error",
                    "-show_entries",
                    "format=duration:stream=codec_type,duration",
                    "-of",
                    "json",
                ],
                file_path,
            )
            .await?;
        parse_duration_output(&json)
    }

    async fn probe_keyframes(&self, file_path: &Path) -> CutterResult<KeyframeSet> {
        let json = self
            .run_json(
                &[
                    "-v",
                    "error",
                    "-select_streams",
                    "v:0",
                    "-show_entries",
                    "packet=pts_time,flags:format=start_time",
                    "-of",
                    "json",
                ],
                file_path,
            )
            .await?;
        parse_keyframe_output(&json)
    }

    async fn probe_video_codec(&self, file_path: &Path) -> CutterResult<Option<String>> {
        let json = self
            .run_json(
                &[
                    "-v",
                    "error",
                    "-select_streams",
                    "v:0",
                    "-show_entries",
                    "stream=codec_name",
                    "-of",
                    "json",
                ],
                file_path,
            )
            .await?;
        parse_codec_output(&json)
    }
}

/// Duration of the first video stream, falling back to the container
fn parse_duration_output(json: &str) -> CutterResult<Timestamp> {
    let output: DurationOutput = serde_json::from_str(json)?;

    let stream_duration = output
        .streams
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("video"))
        .find_map(|s| s.duration.as_deref())
        .filter(|d| *d != "N/A");
    let format_duration = output
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .filter(|d| *d != "N/A");

    let raw = stream_duration
        .or(format_duration)
        .ok_or_else(|| CutterError::probe("Could not determine media duration"))?;
    parse_seconds(raw)
}

/// Presentation times of packets flagged `K`, relative to the container
/// start time.
///
/// ffmpeg's input `-ss` counts from the start of the file, while packet
/// `pts_time` is absolute.
fn parse_keyframe_output(json: &str) -> CutterResult<KeyframeSet> {
    let output: PacketOutput = serde_json::from_str(json)?;

    let start_time = output
        .format
        .as_ref()
        .and_then(|f| f.start_time.as_deref())
        .filter(|t| *t != "N/A")
        .map(parse_seconds)
        .transpose()?
        .unwrap_or(Timestamp::ZERO);
    if start_time != Timestamp::ZERO {
        debug!("Shifting keyframes by container start time {}", start_time);
    }

    let timestamps = output
        .packets
        .iter()
        .filter(|p| p.flags.starts_with('K'))
        .filter_map(|p| p.pts_time.as_deref())
        .filter(|t| *t != "N/A")
        .map(|t| parse_seconds(t).map(|pts| pts - start_time))
        .collect::<CutterResult<Vec<_>>>()?;

    // Decode order differs from presentation order when B-frames are present
    Ok(KeyframeSet::from_unsorted(timestamps))
}

/// Codec name of the first video stream, if the file has one
fn parse_codec_output(json: &str) -> CutterResult<Option<String>> {
    let output: CodecOutput = serde_json::from_str(json)?;
    Ok(output
        .streams
        .into_iter()
        .find_map(|s| s.codec_name)
        .filter(|name| !name.is_empty()))
}
