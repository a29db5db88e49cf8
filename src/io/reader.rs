//! File reading for build outputs.
//!
//! Source maps and static assets can be large; files past [`MMAP_THRESHOLD`]
//! are mapped and copied out instead of read through a buffer.

// Memory mapping requires unsafe; the mapping is read-only and dropped before returning.
#![allow(unsafe_code)]

use crate::error::{IoError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Files at least this large are memory mapped.
pub const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Archive records store sizes as `u32`.
pub const MAX_FILE_SIZE: u64 = u32::MAX as u64;

/// Reads a file as raw bytes.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] for a missing file, or a read error if
/// the file can't be read or exceeds [`MAX_FILE_SIZE`].
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let display = || path.display().to_string();
    let read_failed = |reason: String| IoError::ReadFailed {
        path: display(),
        reason,
    };

    if !path.exists() {
        return Err(IoError::FileNotFound { path: display() }.into());
    }

    let mut file = File::open(path).map_err(|e| read_failed(e.to_string()))?;
    let size = file
        .metadata()
        .map_err(|e| read_failed(e.to_string()))?
        .len();
    if size > MAX_FILE_SIZE {
        return Err(read_failed(format!("{size} bytes exceeds {MAX_FILE_SIZE}")).into());
    }

    if size >= MMAP_THRESHOLD {
        // Safety: read-only mapping, copied out before the map is dropped
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| IoError::MmapFailed {
            path: display(),
            reason: e.to_string(),
        })?;
        return Ok(mmap.to_vec());
    }

    let mut buffer = Vec::with_capacity(usize::try_from(size).unwrap_or_default());
    file.read_to_end(&mut buffer)
        .map_err(|e| read_failed(e.to_string()))?;
    Ok(buffer)
}

/// Reads a UTF-8 text file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    String::from_utf8(read_bytes(path)?).map_err(|e| {
        IoError::ReadFailed {
            path: path.display().to_string(),
            reason: format!("invalid UTF-8: {e}"),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("remoteEntry.js");
        std::fs::write(&file_path, "var FooBar;").unwrap();

        assert_eq!(read_file(&file_path).unwrap(), "var FooBar;");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_bytes("/nonexistent/dist/remoteEntry.js").unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_read_binary_asset() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("logo.png");
        let content = b"\x89PNG\r\n\x1a\n\x00\x01";
        std::fs::write(&file_path, content).unwrap();

        assert_eq!(read_bytes(&file_path).unwrap(), content);
        assert!(read_file(&file_path).is_err());
    }

    #[test]
    fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.css");
        std::fs::write(&file_path, "").unwrap();

        assert!(read_bytes(&file_path).unwrap().is_empty());
    }

    #[test]
    fn test_read_mapped_source_map() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("index.js.map");
        let content: Vec<u8> = (0..255u8).cycle().take(1024 * 1024 + 100).collect();
        std::fs::write(&file_path, &content).unwrap();

        assert_eq!(read_bytes(&file_path).unwrap(), content);
    }
}
