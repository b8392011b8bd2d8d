// Tracing log adapter - Structured logging using tracing crate

use tracing_subscriber::EnvFilter;

use crate::error::{CutterError, CutterResult};

/// Levels accepted by `--log-level`
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Build the filter: `RUST_LOG` when set, otherwise `level`
pub fn build_filter(level: &str) -> CutterResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(CutterError::config(format!("Invalid log level: {}", level)));
    }
    EnvFilter::try_new(&level)
        .map_err(|e| CutterError::config(format!("Invalid log filter: {}", e)))
}

/// Install the global subscriber, writing to stderr.
///
/// Safe to call twice; the second subscriber is ignored.
pub fn init_logging(level: &str, json: bool) -> CutterResult<()> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Already-installed subscriber is fine (tests, repeated init)
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(build_filter("chatty").is_err());
        assert!(build_filter("DEBUG").is_ok());
    }

    #[test]
    fn test_init_twice() {
        assert!(init_logging("info", false).is_ok());
        assert!(init_logging("info", true).is_ok());
    }
}
