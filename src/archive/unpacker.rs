//! Reads plugin archives back, for hosts and for `npdk unpack`.

use super::format::PluginArchive;
use crate::error::{ArchiveError, Result};
use crate::io::{ensure_dir, read_bytes, write_file};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Reads and decodes the archive at `path`.
///
/// # Errors
///
/// Returns an error if the file can't be read or is not a valid archive.
pub fn unpack<P: AsRef<Path>>(path: P) -> Result<PluginArchive> {
    let path = path.as_ref();
    let archive = PluginArchive::from_bytes(&read_bytes(path)?)?;
    debug!(path = %path.display(), entries = archive.len(), "read plugin archive");
    Ok(archive)
}

impl PluginArchive {
    /// Writes every entry below `dir`, creating directories as needed.
    ///
    /// All names are checked before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::UnsafePath`] for names that are absolute or
    /// contain `..`, or an I/O error if a file can't be written.
    pub fn extract<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let targets = self
            .iter()
            .map(|entry| safe_join(dir, &entry.name).map(|path| (path, entry)))
            .collect::<Result<Vec<_>>>()?;

        ensure_dir(dir)?;
        let mut written = Vec::with_capacity(targets.len());
        for (path, entry) in targets {
            write_file(&path, &entry.content)?;
            written.push(path);
        }

        info!(dir = %dir.display(), files = written.len(), "extracted plugin archive");
        Ok(written)
    }
}

fn safe_join(dir: &Path, name: &str) -> Result<PathBuf> {
    let unsafe_path = || ArchiveError::UnsafePath {
        name: name.to_string(),
    };

    if name.is_empty() || name.contains('\\') {
        return Err(unsafe_path().into());
    }

    let mut path = dir.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => path.push(part),
            _ => return Err(unsafe_path().into()),
        }
    }
    Ok(path)
}
