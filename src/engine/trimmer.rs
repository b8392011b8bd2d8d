//! Trimmer session: plans part extraction and concatenation for one source
//!
//! A [`Trimmer`] is created once per input file. It holds the media profile
//! (read once from the inspector), a private temporary directory inside the
//! work root, and the registry of every temporary file it has named. Planning
//! is synchronous and performs no I/O; [`Trimmer::clean_temp`] ends the
//! session's file lifecycle explicitly.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::domain::errors::PlanError;
use crate::domain::model::{CutRequest, MediaProfile, PartFile, SegmentKind, SubRange, Timestamp};
use crate::engine::codec::{quality_options, resolve_encoder, AUTO_ENCODER};
use crate::engine::command::{InputSpec, MediaCommand, OutputSpec, StagedFile};
use crate::error::CutterResult;
use crate::planner::CutPlanner;
use crate::ports::ProbePort;
use crate::utils::time::format_seconds;

/// Encoding and tool settings used when building commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimSettings {
    /// ffmpeg executable
    pub ffmpeg: PathBuf,
    /// Video encoder for re-encoded edges, `auto` to follow the source codec
    pub video_encoder: String,
    /// Constant rate factor for re-encoded edges
    pub crf: u8,
    /// Encoder preset for re-encoded edges
    pub preset: String,
}

impl Default for TrimSettings {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            video_encoder: AUTO_ENCODER.to_string(),
            crf: 18,
            preset: "medium".to_string(),
        }
    }
}

/// Part files and the commands producing them for one cut request
#[derive(Debug, Clone)]
pub struct TrimPlan {
    /// Part files in chronological order
    pub parts: Vec<PartFile>,
    /// Stream-copy commands, independent of each other
    pub copy_commands: Vec<MediaCommand>,
    /// Re-encode commands, independent of each other
    pub reencode_commands: Vec<MediaCommand>,
}

impl TrimPlan {
    /// Every command of the plan, copies first
    pub fn commands(&self) -> impl Iterator<Item = &MediaCommand> {
        self.copy_commands.iter().chain(self.reencode_commands.iter())
    }
}

/// Segment-splitting session for a single input file
pub struct Trimmer {
    input: PathBuf,
    profile: MediaProfile,
    settings: TrimSettings,
    planner: CutPlanner,
    part_extension: String,
    temp_dir: Option<TempDir>,
    temp_root: PathBuf,
    registry: Vec<PathBuf>,
    next_id: u32,
}

impl Trimmer {
    /// Probe `input` once and open a session whose temporary files live
    /// under `work_root`
    pub async fn open(
        probe: &dyn ProbePort,
        input: impl Into<PathBuf>,
        work_root: &Path,
        settings: TrimSettings,
    ) -> CutterResult<Self> {
        let input = input.into();
        info!("Reading keyframes of {}", input.display());
        let profile = probe.probe_profile(&input).await?;
        info!(
            "Got {} keyframes, total duration={}s",
            profile.keyframes.len(),
            profile.duration
        );
        Self::new(input, profile, work_root, settings)
    }

    /// Open a session from an already known media profile.
    ///
    /// Fails when the configured encoder cannot produce the source's codec.
    pub fn new(
        input: impl Into<PathBuf>,
        profile: MediaProfile,
        work_root: &Path,
        mut settings: TrimSettings,
    ) -> CutterResult<Self> {
        let input = input.into();
        settings.video_encoder =
            resolve_encoder(&settings.video_encoder, profile.video_codec.as_deref())?;
        let work_root = work_root.canonicalize()?;
        let temp_dir = tempfile::Builder::new()
            .prefix(".llc-parts-")
            .tempdir_in(&work_root)?;
        let temp_root = temp_dir.path().to_path_buf();
        debug!("Temporary parts directory: {}", temp_root.display());

        let part_extension = input
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| "mkv".to_string());

        Ok(Self {
            input,
            profile,
            settings,
            planner: CutPlanner::new(),
            part_extension,
            temp_dir: Some(temp_dir),
            temp_root,
            registry: Vec::new(),
            next_id: 0,
        })
    }

    /// Source media path
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Duration and keyframes of the source
    pub fn profile(&self) -> &MediaProfile {
        &self.profile
    }

    /// Directory holding this session's temporary files
    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    /// Every temporary file named so far that has not been cleaned up
    pub fn registered_files(&self) -> &[PathBuf] {
        &self.registry
    }

    /// Plan the extraction of `[start, end)`.
    ///
    /// The range is validated before any part file is named, so a rejected
    /// request leaves the session untouched.
    pub fn generate_trim(
        &mut self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<TrimPlan, PlanError> {
        let request = CutRequest::new(start, end, self.profile.duration)?;
        let ranges = self.planner.plan(&self.profile, &request);

        let mut plan = TrimPlan {
            parts: Vec::with_capacity(ranges.len()),
            copy_commands: Vec::new(),
            reencode_commands: Vec::new(),
        };

        let extension = self.part_extension.clone();
        for range in ranges {
            let path = self.allocate("part", &extension);
            let command = self.extract_command(&range, &path);
            match range.kind {
                SegmentKind::Copy => plan.copy_commands.push(command),
                SegmentKind::Reencode => plan.reencode_commands.push(command),
            }
            plan.parts.push(PartFile { path, range });
        }

        debug!(
            "Planned {} parts ({} copy, {} re-encode) for {}s - {}s",
            plan.parts.len(),
            plan.copy_commands.len(),
            plan.reencode_commands.len(),
            start,
            end
        );
        Ok(plan)
    }

    /// Plan the lossless concatenation of `parts`, in order, into `output`
    pub fn generate_merge(
        &mut self,
        parts: &[PartFile],
        output: &Path,
    ) -> Result<MediaCommand, PlanError> {
        if parts.is_empty() {
            return Err(PlanError::NoParts);
        }

        let list_path = self.allocate("concat", "txt");
        let contents: String = parts
            .iter()
            .map(|part| format!("file '{}'\n", escape_concat_path(part.path())))
            .collect();

        let command = MediaCommand::new(&self.settings.ffmpeg)
            .global_options(["-hide_banner", "-nostdin", "-y"])
            .job(
                InputSpec {
                    options: strings(&["-f", "concat", "-safe", "0"]),
                    path: list_path.clone(),
                },
                OutputSpec {
                    options: strings(&["-c", "copy"]),
                    path: output.to_path_buf(),
                },
            )
            .stage(StagedFile {
                path: list_path,
                contents,
            });

        Ok(command)
    }

    /// Remove every temporary file this session has named, then its
    /// directory. Missing files are expected; other failures are logged.
    pub fn clean_temp(&mut self) {
        for path in self.registry.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove temporary file {}: {}", path.display(), e),
            }
        }

        if let Some(dir) = self.temp_dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!("Removed temporary directory {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(
                    "Failed to remove temporary directory {}: {}",
                    path.display(),
                    e
                ),
            }
        }
    }

    /// Name a fresh temporary file and record it for cleanup
    fn allocate(&mut self, stem: &str, extension: &str) -> PathBuf {
        self.next_id += 1;
        let path = self
            .temp_root
            .join(format!("{}-{:05}.{}", stem, self.next_id, extension));
        self.registry.push(path.clone());
        path
    }

    fn extract_command(&self, range: &SubRange, output: &Path) -> MediaCommand {
        let input = InputSpec {
            options: vec![
                "-ss".to_string(),
                format_seconds(range.start),
                "-t".to_string(),
                format_seconds(range.duration()),
            ],
            path: self.input.clone(),
        };

        let options = match range.kind {
            SegmentKind::Copy => strings(&["-c", "copy", "-dn", "-avoid_negative_ts", "make_zero"]),
            SegmentKind::Reencode => {
                let encoder = &self.settings.video_encoder;
                let mut options = vec!["-c:v".to_string(), encoder.clone()];
                options.extend(quality_options(
                    encoder,
                    self.settings.crf,
                    &self.settings.preset,
                ));
                options.extend(strings(&[
                    "-c:a",
                    "copy",
                    "-c:s",
                    "copy",
                    "-dn",
                    "-avoid_negative_ts",
                    "make_zero",
                ]));
                options
            }
        };

        MediaCommand::new(&self.settings.ffmpeg)
            .global_options(["-hide_banner", "-nostdin", "-y"])
            .job(
                input,
                OutputSpec {
                    options,
                    path: output.to_path_buf(),
                },
            )
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Escape a path for a single-quoted concat demuxer `file` directive
fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::KeyframeSet;
    use crate::error::CutterError;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn trimmer(work: &TempDir) -> Trimmer {
        let profile = MediaProfile::new(
            dec!(6.0),
            KeyframeSet::new(vec![dec!(0), dec!(2.0), dec!(4.0), dec!(6.0)]).unwrap(),
        );
        Trimmer::new("/media/source.MP4", profile, work.path(), TrimSettings::default()).unwrap()
    }

    #[test]
    fn test_generate_trim_scenario() {
        let work = TempDir::new().unwrap();
        let mut trimmer = trimmer(&work);

        let plan = trimmer.generate_trim(dec!(1.0), dec!(5.0)).unwrap();
        let ranges: Vec<SubRange> = plan.parts.iter().map(|p| p.range).collect();
        assert_eq!(
            ranges,
            vec![
                SubRange::reencode(dec!(1.0), dec!(2.0)),
                SubRange::copy(dec!(2.0), dec!(4.0)),
                SubRange::reencode(dec!(4.0), dec!(5.0)),
            ]
        );
        assert_eq!(plan.copy_commands.len(), 1);
        assert_eq!(plan.reencode_commands.len(), 2);

        for part in &plan.parts {
            assert!(part.path.starts_with(trimmer.temp_root()));
            assert_eq!(part.path.extension().unwrap(), "mp4");
        }
    }

    #[test]
    fn test_commands_target_their_parts() {
        let work = TempDir::new().unwrap();
        let mut trimmer = trimmer(&work);
        let plan = trimmer.generate_trim(dec!(1.0), dec!(5.0)).unwrap();

        let copy_line = plan.copy_commands[0].to_shell_line();
        assert!(copy_line.contains("-ss 2 -t 2 -i /media/source.MP4"));
        assert!(copy_line.contains("-c copy"));
        assert_eq!(
            plan.copy_commands[0].outputs().collect::<Vec<_>>(),
            vec![plan.parts[1].path()]
        );

        let reencode_line = plan.reencode_commands[1].to_shell_line();
        assert!(reencode_line.contains("-ss 4 -t 1 -i /media/source.MP4"));
        assert!(reencode_line.contains("-c:v libx264 -crf 18 -preset medium"));
    }

    #[test]
    fn test_reencode_follows_source_codec() {
        let work = TempDir::new().unwrap();
        let profile = MediaProfile::new(
            dec!(6.0),
            KeyframeSet::new(vec![dec!(0), dec!(2.0), dec!(4.0)]).unwrap(),
        )
        .with_video_codec(Some("hevc".to_string()));
        let mut trimmer =
            Trimmer::new("/media/drone.mov", profile, work.path(), TrimSettings::default())
                .unwrap();

        let plan = trimmer.generate_trim(dec!(1.0), dec!(3.0)).unwrap();
        for command in &plan.reencode_commands {
            let line = command.to_shell_line();
            assert!(line.contains("-c:v libx265 -crf 18 -preset medium"), "{}", line);
            assert!(!line.contains("libx264"));
        }
    }

    #[test]
    fn test_mismatched_encoder_is_rejected() {
        let work = TempDir::new().unwrap();
        let profile = MediaProfile::new(dec!(6.0), KeyframeSet::default())
            .with_video_codec(Some("hevc".to_string()));
        let settings = TrimSettings {
            video_encoder: "libx264".to_string(),
            ..TrimSettings::default()
        };

        let err = Trimmer::new("/media/drone.mov", profile, work.path(), settings)
            .err()
            .unwrap();
        assert!(matches!(err, CutterError::Config { .. }));
        // Nothing was created for the rejected session
        assert!(std::fs::read_dir(work.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_part_names_never_repeat() {
        let work = TempDir::new().unwrap();
        let mut trimmer = trimmer(&work);

        let first = trimmer.generate_trim(dec!(1.0), dec!(5.0)).unwrap();
        let second = trimmer.generate_trim(dec!(1.0), dec!(5.0)).unwrap();

        for a in &first.parts {
            assert!(second.parts.iter().all(|b| a.path != b.path));
        }
        assert_eq!(trimmer.registered_files().len(), 6);
    }

    #[test]
    fn test_rejected_request_allocates_nothing() {
        let work = TempDir::new().unwrap();
        let mut trimmer = trimmer(&work);

        assert_eq!(
            trimmer.generate_trim(dec!(3), dec!(3)).unwrap_err(),
            PlanError::EmptyRange { at: dec!(3) }
        );
        assert!(matches!(
            trimmer.generate_trim(dec!(1), dec!(7)),
            Err(PlanError::OutOfBounds { .. })
        ));
        assert!(trimmer.registered_files().is_empty());

        let plan = trimmer.generate_trim(dec!(2.0), dec!(4.0)).unwrap();
        assert!(plan.parts[0].path.ends_with("part-00001.mp4"));
    }

    #[test]
    fn test_generate_merge() {
        let work = TempDir::new().unwrap();
        let mut trimmer = trimmer(&work);
        let plan = trimmer.generate_trim(dec!(1.0), dec!(5.0)).unwrap();

        let output = work.path().join("00 Intro.mp4");
        let merge = trimmer.generate_merge(&plan.parts, &output).unwrap();

        assert_eq!(merge.outputs().collect::<Vec<_>>(), vec![output.as_path()]);
        assert_eq!(merge.staged_files().len(), 1);

        let list = &merge.staged_files()[0];
        let lines: Vec<&str> = list.contents.lines().collect();
        assert_eq!(lines.len(), 3);
        for (line, part) in lines.iter().zip(&plan.parts) {
            assert_eq!(*line, format!("file '{}'", part.path.display()));
        }
        assert!(merge.to_shell_line().contains("-f concat -safe 0"));
        assert!(trimmer.registered_files().contains(&list.path));
    }

    #[test]
    fn test_generate_merge_without_parts_fails() {
        let work = TempDir::new().unwrap();
        let mut trimmer = trimmer(&work);
        assert_eq!(
            trimmer
                .generate_merge(&[], &work.path().join("out.mp4"))
                .unwrap_err(),
            PlanError::NoParts
        );
    }

    #[test]
    fn test_clean_temp_is_idempotent() {
        let work = TempDir::new().unwrap();
        let mut trimmer = trimmer(&work);
        let root = trimmer.temp_root().to_path_buf();

        let plan = trimmer.generate_trim(dec!(1.0), dec!(5.0)).unwrap();
        // Only one part was ever produced
        std::fs::write(plan.parts[0].path(), b"part").unwrap();

        trimmer.clean_temp();
        assert!(!plan.parts[0].path.exists());
        assert!(!root.exists());
        assert!(trimmer.registered_files().is_empty());

        trimmer.clean_temp();
    }

    #[test]
    fn test_clean_temp_without_segments() {
        let work = TempDir::new().unwrap();
        let mut trimmer = trimmer(&work);
        trimmer.clean_temp();
        trimmer.clean_temp();
        assert!(std::fs::read_dir(work.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_escape_concat_path() {
        assert_eq!(
            escape_concat_path(Path::new("/tmp/it's.mp4")),
            r"/tmp/it'\''s.mp4"
        );
    }
}
