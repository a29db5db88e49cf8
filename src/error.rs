//! Error types for npdk operations.
//!
//! This module provides the error hierarchy using `thiserror` for template
//! rendering, plugin manifests, archives, file I/O, watching and CLI commands.

use thiserror::Error;

/// Result type alias for npdk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for npdk operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Template or naming errors (project generation).
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Plugin manifest errors (`plugin.conf.toml`).
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Plugin archive errors (pack/unpack).
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// File watcher errors.
    #[error("watch error: {0}")]
    Watch(String),
}

/// Errors raised while validating names and rendering templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The plugin name cannot be used to derive identifiers.
    #[error("invalid plugin name '{name}': {reason}")]
    InvalidName {
        /// Name as supplied by the user.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A template value cannot be embedded safely.
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue {
        /// Placeholder the value was meant for.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The template engine rejected a template, e.g. an undefined variable.
    #[error("failed to render {template}: {reason}")]
    Render {
        /// Template path.
        template: String,
        /// Engine error, including its causes.
        reason: String,
    },

    /// Rendered output still contains template syntax.
    #[error("unresolved template syntax in {template}: {remaining}")]
    Unresolved {
        /// Template path.
        template: String,
        /// The residual tokens, comma separated.
        remaining: String,
    },

    /// Target directory is not empty and `--force` was not given.
    #[error("target directory is not empty: {path}. Use --force to overwrite")]
    TargetNotEmpty {
        /// Target directory.
        path: String,
    },
}

/// Errors for the `plugin.conf.toml` manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found in the searched location.
    #[error("plugin.conf.toml not found in {location}")]
    NotFound {
        /// Directory or path that was searched.
        location: String,
    },

    /// More than one manifest found while packing.
    #[error("multiple plugin.conf.toml files found: {first} and {second}")]
    Duplicate {
        /// First manifest path.
        first: String,
        /// Second manifest path.
        second: String,
    },

    /// TOML syntax or schema error.
    #[error("failed to parse manifest: {0}")]
    Parse(String),

    /// A required field is missing or malformed.
    #[error("invalid manifest field '{field}': {reason}")]
    Invalid {
        /// Field path, e.g. `package.name`.
        field: String,
        /// Reason the value was rejected.
        reason: String,
    },
}

/// Errors for the plugin archive format.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Source directory to pack does not exist.
    #[error("source directory does not exist: {path}")]
    SourceMissing {
        /// Source directory.
        path: String,
    },

    /// A record is cut short.
    #[error("truncated archive at byte offset {offset}")]
    Truncated {
        /// Offset into the decompressed payload.
        offset: usize,
    },

    /// An entry name is not valid UTF-8.
    #[error("entry name at byte offset {offset} is not valid UTF-8")]
    InvalidName {
        /// Offset into the decompressed payload.
        offset: usize,
    },

    /// The same entry name appears twice.
    #[error("duplicate archive entry: {name}")]
    DuplicateEntry {
        /// Entry name.
        name: String,
    },

    /// Entry is larger than the format can describe.
    #[error("entry too large: {name} ({size} bytes)")]
    EntryTooLarge {
        /// Entry name.
        name: String,
        /// Entry size in bytes.
        size: usize,
    },

    /// Compression or decompression failed.
    #[error("compression error: {0}")]
    Compression(String),

    /// Entry resolves outside the extraction directory.
    #[error("entry escapes the target directory: {name}")]
    UnsafePath {
        /// Entry name.
        name: String,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Failed to write file.
    #[error("failed to write file: {path}: {reason}")]
    WriteFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping error.
    #[error("memory mapping failed: {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory creation error.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Directory traversal error.
    #[error("failed to walk directory: {0}")]
    Walk(String),

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),

    /// The build command exited unsuccessfully.
    #[error("build command '{command}' failed with {status}")]
    BuildFailed {
        /// Command line that was run.
        command: String,
        /// Exit status description.
        status: String,
    },
}

// Implement From traits for library errors

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Self::Io(IoError::Walk(err.to_string()))
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Self::Watch(err.to_string())
    }
}

impl From<toml::de::Error> for ManifestError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Manifest(err.into())
    }
}
