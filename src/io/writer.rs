//! File and directory writing helpers.

use crate::error::{IoError, Result};
use std::path::Path;

/// Writes `content` to `path`, creating parent directories if needed.
///
/// # Errors
///
/// Returns an error if directory creation or file writing fails.
pub fn write_file<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path_ref = path.as_ref();

    if let Some(parent) = path_ref.parent() {
        ensure_dir(parent)?;
    }

    std::fs::write(path_ref, content).map_err(|e| IoError::WriteFailed {
        path: path_ref.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;

    Ok(())
}

/// Creates `dir` and its parents if they don't exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(dir).map_err(|e| IoError::DirectoryFailed {
        path: dir.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;

    Ok(())
}

/// Returns true if `dir` is missing or contains no entries.
///
/// # Errors
///
/// Returns an error if `dir` exists but cannot be listed.
pub fn is_dir_empty<P: AsRef<Path>>(dir: P) -> Result<bool> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(true);
    }

    let mut entries = std::fs::read_dir(dir).map_err(|e| IoError::ReadFailed {
        path: dir.to_string_lossy().to_string(),
        reason: e.to_string(),
    })?;

    Ok(entries.next().is_none())
}
