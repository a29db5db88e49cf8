//! Plugin archive wire format.
//!
//! An archive file is a single brotli stream (quality 11, window 22) whose
//! decompressed payload is a sequence of records
//!
//! ```text
//! name_len u32 BE | content_len u32 BE | name (UTF-8) | content
//! ```

use crate::error::{ArchiveError, ManifestError, Result};
use crate::manifest::{MANIFEST_FILE, PluginManifest};
use brotli::{CompressorWriter, Decompressor};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{Read, Write};

/// Archive file extension (without the leading dot).
pub const ARCHIVE_EXTENSION: &str = "notex.plugin";

/// Brotli quality used when writing archives.
pub const COMPRESSION_QUALITY: u32 = 11;

/// Brotli window size (log2) used when writing archives.
pub const COMPRESSION_WINDOW: u32 = 22;

const BUFFER_SIZE: usize = 4096;
const RECORD_HEADER_LEN: usize = 8;

/// One file stored in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path relative to the packed directory, `/` separated.
    pub name: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

impl ArchiveEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Content as UTF-8 text, if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }

    /// Final path component of the entry name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Listing row for an entry, without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    /// Entry name.
    pub name: String,
    /// Content size in bytes.
    pub size: usize,
}

/// An ordered set of uniquely named entries.
#[derive(Debug, Clone, Default)]
pub struct PluginArchive {
    entries: Vec<ArchiveEntry>,
    names: HashSet<String>,
}

impl PluginArchive {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::DuplicateEntry`] if the name is already present,
    /// or [`ArchiveError::EntryTooLarge`] if a length doesn't fit in `u32`.
    pub fn push(&mut self, entry: ArchiveEntry) -> Result<()> {
        if u32::try_from(entry.name.len()).is_err() || u32::try_from(entry.content.len()).is_err()
        {
            return Err(ArchiveError::EntryTooLarge {
                size: entry.content.len(),
                name: entry.name,
            }
            .into());
        }
        if !self.names.insert(entry.name.clone()) {
            return Err(ArchiveError::DuplicateEntry { name: entry.name }.into());
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in archive order.
    pub fn iter(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter()
    }

    /// Looks up an entry by its full name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Sum of all entry content sizes.
    #[must_use]
    pub fn content_size(&self) -> usize {
        self.entries.iter().map(|e| e.content.len()).sum()
    }

    /// Name and size of every entry.
    #[must_use]
    pub fn summaries(&self) -> Vec<EntrySummary> {
        self.entries
            .iter()
            .map(|e| EntrySummary {
                name: e.name.clone(),
                size: e.content.len(),
            })
            .collect()
    }

    /// Parses the bundled `plugin.conf.toml`.
    ///
    /// The manifest is looked up by file name anywhere in the archive,
    /// preferring the shallowest one.
    ///
    /// # Errors
    ///
    /// Returns an error if no manifest entry exists or it fails to parse.
    pub fn manifest(&self) -> Result<PluginManifest> {
        let entry = self
            .entries
            .iter()
            .filter(|e| e.file_name() == MANIFEST_FILE)
            .min_by_key(|e| e.name.matches('/').count())
            .ok_or_else(|| ManifestError::NotFound {
                location: "archive".to_string(),
            })?;
        let text = entry
            .as_str()
            .ok_or_else(|| ManifestError::Parse("manifest is not valid UTF-8".to_string()))?;
        PluginManifest::from_toml_str(text)
    }

    /// Serialises the entries as uncompressed records.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn encode_records(&self) -> Vec<u8> {
        let capacity = self
            .entries
            .iter()
            .map(|e| RECORD_HEADER_LEN + e.name.len() + e.content.len())
            .sum();
        let mut out = Vec::with_capacity(capacity);
        for entry in &self.entries {
            // lengths were checked in push
            out.extend_from_slice(&(entry.name.len() as u32).to_be_bytes());
            out.extend_from_slice(&(entry.content.len() as u32).to_be_bytes());
            out.extend_from_slice(entry.name.as_bytes());
            out.extend_from_slice(&entry.content);
        }
        out
    }

    /// Parses uncompressed records.
    ///
    /// # Errors
    ///
    /// Returns an error on truncated records, non-UTF-8 names or duplicate names.
    pub fn decode_records(mut payload: &[u8]) -> Result<Self> {
        let total = payload.len();
        let mut archive = Self::new();

        while !payload.is_empty() {
            let offset = total - payload.len();
            let (name_len, rest) = read_u32(payload).ok_or(ArchiveError::Truncated { offset })?;
            let (content_len, rest) = read_u32(rest).ok_or(ArchiveError::Truncated { offset })?;

            let body = offset + RECORD_HEADER_LEN;
            if rest.len() < name_len {
                return Err(ArchiveError::Truncated { offset: body }.into());
            }
            let (name, rest) = rest.split_at(name_len);
            if rest.len() < content_len {
                return Err(ArchiveError::Truncated {
                    offset: body + name_len,
                }
                .into());
            }
            let (content, rest) = rest.split_at(content_len);

            let name = std::str::from_utf8(name)
                .map_err(|_| ArchiveError::InvalidName { offset: body })?;
            archive.push(ArchiveEntry::new(name, content))?;
            payload = rest;
        }

        Ok(archive)
    }

    /// Serialises to the compressed on-disk form.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Compression`] if the encoder fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = CompressorWriter::new(
            Vec::new(),
            BUFFER_SIZE,
            COMPRESSION_QUALITY,
            COMPRESSION_WINDOW,
        );
        writer
            .write_all(&self.encode_records())
            .map_err(|e| ArchiveError::Compression(e.to_string()))?;
        Ok(writer.into_inner())
    }

    /// Parses the compressed on-disk form.
    ///
    /// # Errors
    ///
    /// Returns an error if the brotli stream is corrupt or cut short, or the
    /// records are malformed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ArchiveError::Truncated { offset: 0 }.into());
        }

        let mut payload = Vec::new();
        Decompressor::new(bytes, BUFFER_SIZE)
            .read_to_end(&mut payload)
            .map_err(|e| ArchiveError::Compression(e.to_string()))?;
        Self::decode_records(&payload)
    }
}

fn read_u32(bytes: &[u8]) -> Option<(usize, &[u8])> {
    let (head, rest) = bytes.split_first_chunk::<4>()?;
    let value = usize::try_from(u32::from_be_bytes(*head)).ok()?;
    Some((value, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PluginArchive {
        let mut archive = PluginArchive::new();
        archive
            .push(ArchiveEntry::new("remoteEntry.js", "var FooBar;"))
            .unwrap();
        archive
            .push(ArchiveEntry::new("static/logo.png", vec![0x89, 0x50, 0x00]))
            .unwrap();
        archive
    }

    #[test]
    fn test_record_layout() {
        let mut archive = PluginArchive::new();
        archive.push(ArchiveEntry::new("a", "xy")).unwrap();
        assert_eq!(
            archive.encode_records(),
            vec![0, 0, 0, 1, 0, 0, 0, 2, b'a', b'x', b'y']
        );
    }

    #[test]
    fn test_bytes_preserve_entries() {
        let archive = sample();
        let decoded = PluginArchive::from_bytes(&archive.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(
            decoded.get("static/logo.png").unwrap().content,
            vec![0x89, 0x50, 0x00]
        );
        assert_eq!(
            decoded.get("remoteEntry.js").unwrap().as_str(),
            Some("var FooBar;")
        );
    }

    #[test]
    fn test_bytes_are_a_plain_brotli_stream() {
        let archive = sample();
        let bytes = archive.to_bytes().unwrap();

        let mut payload = Vec::new();
        brotli::Decompressor::new(&bytes[..], 4096)
            .read_to_end(&mut payload)
            .unwrap();
        assert_eq!(payload, archive.encode_records());
    }

    #[test]
    fn test_reads_stream_written_with_host_settings() {
        let records = sample().encode_records();
        let mut bytes = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(&mut bytes, 4096, 11, 22);
            writer.write_all(&records).unwrap();
            writer.flush().unwrap();
        }
        let decoded = PluginArchive::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.summaries(), sample().summaries());
    }

    #[test]
    fn test_empty_archive() {
        let bytes = PluginArchive::new().to_bytes().unwrap();
        assert!(!bytes.is_empty());
        assert!(PluginArchive::from_bytes(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let mut archive = sample();
        let err = archive
            .push(ArchiveEntry::new("remoteEntry.js", "again"))
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_input_rejected() {
        let err = PluginArchive::from_bytes(&[]).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_truncated_records() {
        let records = sample().encode_records();
        for cut in [3, 8, 12, records.len() - 1] {
            let err = PluginArchive::decode_records(&records[..cut]).unwrap_err();
            assert!(err.to_string().contains("truncated"), "cut {cut}: {err}");
        }
    }

    #[test]
    fn test_invalid_name() {
        let records = vec![0, 0, 0, 1, 0, 0, 0, 0, 0xff];
        let err = PluginArchive::decode_records(&records).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_corrupt_compression() {
        let mut bytes = sample().to_bytes().unwrap();
        bytes.truncate(bytes.len() - 3);
        assert!(PluginArchive::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_manifest_lookup() {
        let mut archive = sample();
        assert!(archive.manifest().is_err());

        archive
            .push(ArchiveEntry::new(
                MANIFEST_FILE,
                "[package]\nname = \"foo-bar\"\nversion = \"0.1.0\"\n\n[profile]\nbuild = \"npm run build\"\n",
            ))
            .unwrap();
        assert_eq!(archive.manifest().unwrap().package.name, "foo-bar");
    }

    #[test]
    fn test_summaries() {
        let archive = sample();
        let rows = archive.summaries();
        assert_eq!(rows[0].name, "remoteEntry.js");
        assert_eq!(rows[0].size, 11);
        assert_eq!(archive.content_size(), 14);
        assert_eq!(archive.get("static/logo.png").unwrap().file_name(), "logo.png");
    }
}
