//! External tool discovery

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CutterError, CutterResult};

/// Locate an executable.
///
/// A bare name (`ffmpeg`) is looked up on `PATH`; anything containing a path
/// separator must point at an existing file.
pub fn resolve_tool(configured: &Path) -> CutterResult<PathBuf> {
    let resolved = if configured.components().count() > 1 {
        configured.is_file().then(|| configured.to_path_buf())
    } else {
        which::which(configured).ok()
    };

    match resolved {
        Some(path) => {
            debug!("Resolved {} to {}", configured.display(), path.display());
            Ok(path)
        }
        None => Err(CutterError::ToolNotFound {
            tool: configured.display().to_string(),
        }),
    }
}
