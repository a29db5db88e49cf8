//! Packs a plugin build output directory into an archive.

use super::format::{ARCHIVE_EXTENSION, ArchiveEntry, PluginArchive};
use crate::error::{ArchiveError, IoError, ManifestError, Result};
use crate::io::{read_bytes, write_file};
use crate::manifest::{MANIFEST_FILE, PluginManifest};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Name prefix of the federation type outputs (`@mf-types/`,
/// `@mf-types.zip`, `@mf-types.d.ts`); these are never packed.
pub const MF_TYPES: &str = "@mf-types";

/// Summary of a written archive.
#[derive(Debug, Clone, Serialize)]
pub struct PackReport {
    /// Path of the written archive.
    pub path: PathBuf,
    /// Plugin name from the manifest.
    pub plugin: String,
    /// Plugin version from the manifest.
    pub version: String,
    /// Number of files packed.
    pub entries: usize,
    /// Total size of packed files.
    pub raw_size: usize,
    /// Size of the archive on disk.
    pub archive_size: usize,
}

/// Walks a build output directory and produces plugin archives.
#[derive(Debug, Clone)]
pub struct Packer {
    source: PathBuf,
}

impl Packer {
    /// Creates a packer for `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::SourceMissing`] if `source` is not a directory.
    pub fn new<P: AsRef<Path>>(source: P) -> Result<Self> {
        let source = source.as_ref();
        if !source.is_dir() {
            return Err(ArchiveError::SourceMissing {
                path: source.display().to_string(),
            }
            .into());
        }
        Ok(Self {
            source: source.to_path_buf(),
        })
    }

    /// The directory being packed.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Reads the source tree into memory.
    ///
    /// Files are visited in name order so archives are reproducible.
    /// Federation type outputs and previously written archives are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree can't be walked or read, or if it does not
    /// contain exactly one valid `plugin.conf.toml`.
    pub fn collect(&self) -> Result<(PluginManifest, PluginArchive)> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.source)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_mf_types(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() || is_archive(entry.path()) {
                continue;
            }
            let name = entry_name(&self.source, entry.path())?;
            debug!(entry = %name, "collecting");
            files.push((name, entry.into_path()));
        }

        let manifest = PluginManifest::load(find_manifest(&files, &self.source)?)?;

        let contents = files
            .par_iter()
            .map(|(_, path)| read_bytes(path))
            .collect::<Result<Vec<_>>>()?;

        let mut archive = PluginArchive::new();
        for ((name, _), content) in files.into_iter().zip(contents) {
            archive.push(ArchiveEntry::new(name, content))?;
        }

        Ok((manifest, archive))
    }

    /// Packs the source tree into `<output_dir>/<name>.notex.plugin`.
    ///
    /// # Errors
    ///
    /// See [`collect`](Self::collect); also fails if the archive can't be written.
    pub fn pack<P: AsRef<Path>>(&self, output_dir: P) -> Result<PackReport> {
        let (manifest, archive) = self.collect()?;
        let bytes = archive.to_bytes()?;
        let path = output_dir.as_ref().join(manifest.archive_file_name());
        write_file(&path, &bytes)?;

        info!(
            plugin = %manifest.package.name,
            entries = archive.len(),
            bytes = bytes.len(),
            path = %path.display(),
            "packed plugin"
        );

        Ok(PackReport {
            path,
            plugin: manifest.package.name,
            version: manifest.package.version,
            entries: archive.len(),
            raw_size: archive.content_size(),
            archive_size: bytes.len(),
        })
    }
}

fn is_mf_types(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with(MF_TYPES))
}

fn is_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(&format!(".{ARCHIVE_EXTENSION}")))
}

/// Relative, `/` separated name of `path` under `root`.
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|e| IoError::Walk(e.to_string()))?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            _ => {
                return Err(ArchiveError::UnsafePath {
                    name: rel.display().to_string(),
                }
                .into());
            }
        }
    }
    Ok(parts.join("/"))
}

/// Finds the single manifest in the collected files.
fn find_manifest<'a>(files: &'a [(String, PathBuf)], source: &Path) -> Result<&'a Path> {
    let mut found = files
        .iter()
        .filter(|(name, _)| name.rsplit('/').next() == Some(MANIFEST_FILE));

    let first = found.next().ok_or_else(|| ManifestError::NotFound {
        location: source.display().to_string(),
    })?;
    if let Some(second) = found.next() {
        return Err(ManifestError::Duplicate {
            first: first.0.clone(),
            second: second.0.clone(),
        }
        .into());
    }

    Ok(&first.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = "[package]\nname = \"foo-bar\"\nversion = \"0.2.0\"\nexposes = [\"./FooBar\"]\n\n[profile]\nbuild = \"npm run build\"\n";

    fn build_output() -> TempDir {
        let temp = TempDir::new().unwrap();
        let dist = temp.path();
        std::fs::write(dist.join(MANIFEST_FILE), MANIFEST).unwrap();
        std::fs::write(dist.join("remoteEntry.js"), "var FooBar;").unwrap();
        std::fs::create_dir_all(dist.join("static/js")).unwrap();
        std::fs::write(dist.join("static/js/index.js"), "export {}").unwrap();
        std::fs::create_dir_all(dist.join(MF_TYPES)).unwrap();
        std::fs::write(dist.join(MF_TYPES).join("index.d.ts"), "declare").unwrap();
        temp
    }

    #[test]
    fn test_missing_source() {
        assert!(Packer::new("/nonexistent/dist").is_err());
    }

    #[test]
    fn test_collect_skips_mf_types() {
        let dist = build_output();
        let (manifest, archive) = Packer::new(dist.path()).unwrap().collect().unwrap();

        assert_eq!(manifest.package.name, "foo-bar");
        let names: Vec<_> = archive.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![MANIFEST_FILE, "remoteEntry.js", "static/js/index.js"]);
    }

    #[test]
    fn test_collect_skips_mf_types_bundles() {
        let dist = build_output();
        std::fs::write(dist.path().join("@mf-types.zip"), [0x50, 0x4b, 0x03, 0x04]).unwrap();
        std::fs::write(dist.path().join("@mf-types.d.ts"), "export {}").unwrap();

        let (_, archive) = Packer::new(dist.path()).unwrap().collect().unwrap();
        let names: Vec<_> = archive.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![MANIFEST_FILE, "remoteEntry.js", "static/js/index.js"]);
    }

    #[test]
    fn test_collect_requires_manifest() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("remoteEntry.js"), "x").unwrap();
        let err = Packer::new(temp.path()).unwrap().collect().unwrap_err();
        assert!(err.to_string().contains("plugin.conf.toml not found"));
    }

    #[test]
    fn test_collect_rejects_two_manifests() {
        let dist = build_output();
        std::fs::write(dist.path().join("static").join(MANIFEST_FILE), MANIFEST).unwrap();
        let err = Packer::new(dist.path()).unwrap().collect().unwrap_err();
        assert!(err.to_string().contains("multiple"));
    }

    #[test]
    fn test_pack_writes_archive() {
        let dist = build_output();
        let out = TempDir::new().unwrap();
        let report = Packer::new(dist.path()).unwrap().pack(out.path()).unwrap();

        assert_eq!(report.path, out.path().join("foo-bar.notex.plugin"));
        assert_eq!(report.entries, 3);
        assert_eq!(report.version, "0.2.0");
        assert!(report.path.is_file());
    }

    #[test]
    fn test_pack_into_source_skips_old_archive() {
        let dist = build_output();
        let packer = Packer::new(dist.path()).unwrap();
        packer.pack(dist.path()).unwrap();
        let report = packer.pack(dist.path()).unwrap();
        assert_eq!(report.entries, 3);
    }
}
