//! Filesystem utilities for agcp.

use std::path::{Path, PathBuf};

use crate::error::UtilError;

/// Whether `path` is an existing regular file that the current user can open.
pub fn is_readable_file(path: &Path) -> bool {
    path.is_file() && std::fs::File::open(path).is_ok()
}

/// Read a whole file into memory.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, UtilError> {
    std::fs::read(path).map_err(|source| UtilError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Return the final path component as a string, or an empty string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_owned()
}

/// Collect all files with the given `extension` directly inside `dir`, sorted by path.
///
/// A missing directory yields an empty list.
///
/// # Errors
/// Returns an error if the glob pattern built from `dir` is invalid.
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, UtilError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let pattern = dir.join(format!("*.{extension}"));
    let pattern_str = pattern.display().to_string();

    let mut files: Vec<PathBuf> = glob::glob(&pattern_str)
        .map_err(|e| UtilError::GlobPattern {
            pattern: pattern_str.clone(),
            message: e.to_string(),
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    files.sort();
    Ok(files)
}
