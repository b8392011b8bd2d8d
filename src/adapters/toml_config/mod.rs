// TOML config adapter - Configuration hierarchy: CLI > Env > File > Defaults

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::codec::AUTO_ENCODER;
use crate::engine::trimmer::TrimSettings;
use crate::error::{CutterError, CutterResult};

/// Config file looked up beside the project when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "llc-cutter.toml";

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "LLC_CUTTER_";

/// Highest CRF value accepted by x264/x265
const MAX_CRF: u8 = 51;

/// Cutter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CutterConfig {
    /// ffmpeg name or path
    pub ffmpeg: PathBuf,
    /// ffprobe name or path
    pub ffprobe: PathBuf,
    /// Video encoder for re-encoded edges, `auto` to follow the source codec
    pub video_encoder: String,
    /// Constant rate factor for re-encoded edges
    pub crf: u8,
    /// Encoder preset for re-encoded edges
    pub preset: String,
    /// Extension of the final segment files
    pub output_extension: String,
    /// Run independent part commands concurrently
    pub parallel: bool,
    /// Upper bound on concurrently running ffmpeg processes
    pub max_jobs: usize,
    /// Join the re-encode commands of one cut into a single ffmpeg run
    pub merge_reencodes: bool,
    /// Extra attempts for a segment whose execution failed
    pub retries: u32,
    /// Probe each produced segment and compare its duration
    pub verify_output: bool,
    /// Accepted duration difference in seconds
    pub verify_tolerance: Decimal,
}

impl Default for CutterConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            video_encoder: AUTO_ENCODER.to_string(),
            crf: 18,
            preset: "medium".to_string(),
            output_extension: "mp4".to_string(),
            parallel: true,
            max_jobs: num_cpus::get().max(1),
            merge_reencodes: true,
            retries: 0,
            verify_output: true,
            verify_tolerance: Decimal::new(1, 1),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    cutter: CutterConfig,
}

/// Overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Force sequential execution
    pub sequential: bool,
}

impl CutterConfig {
    /// Parse the `[cutter]` table of a TOML document
    pub fn from_toml_str(content: &str) -> CutterResult<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| CutterError::config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(file.cutter)
    }

    /// Read a TOML config file
    pub fn from_file(path: &Path) -> CutterResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CutterError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Build the effective configuration for a project.
    ///
    /// An explicit config file must exist; the implicit `llc-cutter.toml`
    /// beside the project is optional.
    pub fn load(
        explicit: Option<&Path>,
        project_dir: &Path,
        overrides: &CliOverrides,
    ) -> CutterResult<Self> {
        let mut config = match explicit {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None => {
                let implicit = project_dir.join(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    info!("Loading configuration from: {}", implicit.display());
                    Self::from_file(&implicit)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_cli(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply `LLC_CUTTER_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> CutterResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        let mut applied = 0;
        if let Some((key, value)) = var("FFMPEG") {
            info!("Found environment override: {} = {}", key, value);
            self.ffmpeg = PathBuf::from(value);
            applied += 1;
        }
        if let Some((key, value)) = var("FFPROBE") {
            info!("Found environment override: {} = {}", key, value);
            self.ffprobe = PathBuf::from(value);
            applied += 1;
        }
        if let Some((key, value)) = var("VIDEO_ENCODER") {
            info!("Found environment override: {} = {}", key, value);
            self.video_encoder = value;
            applied += 1;
        }
        if let Some((key, value)) = var("CRF") {
            info!("Found environment override: {} = {}", key, value);
            self.crf = value
                .trim()
                .parse()
                .map_err(|e| CutterError::config(format!("Invalid {}: {}", key, e)))?;
            applied += 1;
        }
        if let Some((key, value)) = var("PRESET") {
            info!("Found environment override: {} = {}", key, value);
            self.preset = value;
            applied += 1;
        }
        if let Some((key, value)) = var("MAX_JOBS") {
            info!("Found environment override: {} = {}", key, value);
            self.max_jobs = value
                .trim()
                .parse()
                .map_err(|e| CutterError::config(format!("Invalid {}: {}", key, e)))?;
            applied += 1;
        }

        if applied > 0 {
            info!("Applied {} environment variable overrides", applied);
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, overrides: &CliOverrides) {
        if overrides.sequential {
            info!("CLI override: parallel = false");
            self.parallel = false;
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> CutterResult<()> {
        if self.crf > MAX_CRF {
            return Err(CutterError::config(format!(
                "CRF value cannot exceed {}",
                MAX_CRF
            )));
        }
        if self.video_encoder.trim().is_empty() {
            return Err(CutterError::config("video_encoder must not be empty"));
        }
        if self.preset.trim().is_empty() {
            return Err(CutterError::config("preset must not be empty"));
        }
        if self.output_extension.trim().is_empty() || self.output_extension.contains('.') {
            return Err(CutterError::config(
                "output_extension must be a bare extension such as 'mp4'",
            ));
        }
        if self.max_jobs == 0 {
            return Err(CutterError::config("max_jobs must be at least 1"));
        }
        if self.verify_tolerance < Decimal::ZERO {
            return Err(CutterError::config("verify_tolerance must not be negative"));
        }
        Ok(())
    }

    /// Settings for the trimmer
    pub fn trim_settings(&self) -> TrimSettings {
        TrimSettings {
            ffmpeg: self.ffmpeg.clone(),
            video_encoder: self.video_encoder.clone(),
            crf: self.crf,
            preset: self.preset.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = CutterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.crf, 18);
        assert_eq!(config.video_encoder, "auto");
        assert_eq!(config.output_extension, "mp4");
        assert_eq!(config.verify_tolerance, dec!(0.1));
        assert!(config.max_jobs >= 1);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = CutterConfig::from_toml_str(
            r#"
            [cutter]
            video_encoder = "libx265"
            crf = 23
            verify_tolerance = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.video_encoder, "libx265");
        assert_eq!(config.crf, 23);
        assert_eq!(config.verify_tolerance, dec!(0.25));
        assert_eq!(config.preset, "medium");
        assert!(config.parallel);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(
            CutterConfig::from_toml_str("").unwrap(),
            CutterConfig::default()
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CutterConfig::from_toml_str("[cutter]\ncfr = 20\n").unwrap_err();
        assert!(matches!(err, CutterError::Config { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("LLC_CUTTER_CRF", "30"),
            ("LLC_CUTTER_FFMPEG", "/opt/ffmpeg/bin/ffmpeg"),
            ("LLC_CUTTER_MAX_JOBS", "2"),
        ]
        .into_iter()
        .collect();

        let mut config = CutterConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.crf, 30);
        assert_eq!(config.max_jobs, 2);
        assert_eq!(config.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.preset, "medium");
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = CutterConfig::default();
        let result = config.apply_env(|key| (key == "LLC_CUTTER_CRF").then(|| "high".to_string()));
        assert!(matches!(result, Err(CutterError::Config { .. })));
    }

    #[test]
    fn test_cli_beats_file() {
        let mut config = CutterConfig::from_toml_str("[cutter]\nparallel = true\n").unwrap();
        config.apply_cli(&CliOverrides { sequential: true });
        assert!(!config.parallel);
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = CutterConfig {
            crf: 52,
            ..CutterConfig::default()
        };
        assert!(config.validate().is_err());

        config.crf = 51;
        config.max_jobs = 0;
        assert!(config.validate().is_err());

        config.max_jobs = 1;
        config.output_extension = ".mp4".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_implicit_file() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            "[cutter]\noutput_extension = \"mkv\"\n",
        )
        .unwrap();

        let config = CutterConfig::load(None, temp.path(), &CliOverrides::default()).unwrap();
        assert_eq!(config.output_extension, "mkv");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope.toml");
        let err = CutterConfig::load(Some(&missing), temp.path(), &CliOverrides::default())
            .unwrap_err();
        assert!(matches!(err, CutterError::Config { .. }));
    }
}
