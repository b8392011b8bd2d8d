// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tools;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegExecutor;
pub use probe_ffprobe::FFprobeAdapter;
pub use toml_config::{CliOverrides, CutterConfig};
pub use tools::resolve_tool;
pub use tracing_log::init_logging;
