//! # npdk
//!
//! Notex plugin development kit.
//!
//! Notex plugins are React components exposed through module federation and
//! loaded by the Notex host at runtime. npdk covers the author's side of that
//! contract:
//!
//! - **Scaffolding**: generates an rsbuild project whose entry point extends
//!   the host `Plugin` class, with every name placeholder resolved
//! - **Packing**: bundles a build output directory into a compressed
//!   `.notex.plugin` archive
//! - **Unpacking**: reads archives back, for hosts and for inspection
//! - **Watching**: reruns the build and repacks when sources change

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
// Note: unsafe is needed for memory-mapped I/O (memmap2)
#![warn(unsafe_code)]

pub mod archive;
pub mod cli;
pub mod error;
pub mod io;
pub mod logging;
pub mod manifest;
pub mod naming;
pub mod template;
pub mod watch;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export naming and templates
pub use naming::{PluginNames, to_pascal_case};
pub use template::{ScaffoldOptions, ScaffoldReport, TemplateContext, render, scaffold};

// Re-export manifest and archive types
pub use archive::{ArchiveEntry, PackReport, Packer, PluginArchive, unpack};
pub use manifest::{MANIFEST_FILE, PluginManifest};

// Re-export watch types
pub use watch::{PluginWatcher, WatchOptions};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
