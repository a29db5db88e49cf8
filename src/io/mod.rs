//! I/O utilities for npdk.
//!
//! Provides file reading with memory mapping support for large build
//! outputs, plus writing helpers that create directories on demand.

pub mod reader;
pub mod writer;

pub use reader::{MAX_FILE_SIZE, MMAP_THRESHOLD, read_bytes, read_file};
pub use writer::{ensure_dir, is_dir_empty, write_file};
