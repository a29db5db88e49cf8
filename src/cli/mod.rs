//! CLI layer for npdk.
//!
//! Provides the command-line interface using clap, with commands for
//! generating, packing, inspecting and watching plugin projects.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
