// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::model::{KeyframeSet, MediaProfile, Timestamp};
use crate::engine::command::MediaCommand;
use crate::error::CutterResult;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Total duration of the media file in seconds
    async fn probe_duration(&self, file_path: &Path) -> CutterResult<Timestamp>;

    /// Keyframe timestamps of the primary video stream, ascending
    async fn probe_keyframes(&self, file_path: &Path) -> CutterResult<KeyframeSet>;

    /// Codec name of the primary video stream, `None` when unknown
    async fn probe_video_codec(&self, _file_path: &Path) -> CutterResult<Option<String>> {
        Ok(None)
    }

    /// Duration, keyframes and video codec in one go
    async fn probe_profile(&self, file_path: &Path) -> CutterResult<MediaProfile> {
        let duration = self.probe_duration(file_path).await?;
        let keyframes = self.probe_keyframes(file_path).await?;
        let codec = self.probe_video_codec(file_path).await?;
        Ok(MediaProfile::new(duration, keyframes).with_video_codec(codec))
    }
}

/// Port for running planned commands
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Run one command to completion.
    ///
    /// Fails with [`crate::error::CutterError::CommandFailed`] carrying the
    /// command line and a diagnostic when the process does not succeed.
    async fn run(&self, command: &MediaCommand) -> CutterResult<()>;
}
