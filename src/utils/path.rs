//! Path utilities for project-relative inputs and output naming

use std::path::{Path, PathBuf};

/// Characters that cannot appear in a file name on common platforms
const INVALID_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Directory holding the project file (current directory for bare names)
pub fn project_dir(project_file: &Path) -> PathBuf {
    match project_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve `name` against the directory of `project_file`
pub fn resolve_beside(project_file: &Path, name: &str) -> PathBuf {
    project_dir(project_file).join(name)
}

/// Replace characters that are illegal in file names with `_`
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if INVALID_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Output file name for the segment at `index`: `NN <label>.<ext>`
pub fn segment_file_name(index: usize, label: &str, extension: &str) -> String {
    format!("{:02} {}.{}", index, sanitize_label(label.trim()), extension)
}
