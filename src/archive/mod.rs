//! Plugin archives (`.notex.plugin`).
//!
//! `pack` bundles a build output directory into a single compressed file a
//! plugin host can install; `unpack` reads it back.

pub mod format;
pub mod packer;
pub mod unpacker;

pub use format::{
    ARCHIVE_EXTENSION, ArchiveEntry, COMPRESSION_QUALITY, COMPRESSION_WINDOW, EntrySummary,
    PluginArchive,
};
pub use packer::{MF_TYPES, PackReport, Packer};
pub use unpacker::unpack;
