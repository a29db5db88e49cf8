//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::archive::{EntrySummary, PackReport};
use crate::error::Error;
use crate::template::ScaffoldReport;
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats the result of `init`.
#[must_use]
pub fn format_scaffold(report: &ScaffoldReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "Created plugin {} in {}",
                report.names.name(),
                report.root.display()
            );
            let _ = writeln!(output, "  Class:          {}", report.names.class_name());
            let _ = writeln!(output, "  Exposed module: {}", report.names.exposed_module());
            let _ = writeln!(output, "  Library:        {}", report.names.library_name());
            output.push_str("\nFiles:\n");
            for file in &report.files {
                let shown = file.strip_prefix(&report.root).unwrap_or(file);
                let _ = writeln!(output, "  {}", shown.display());
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ScaffoldOutput<'a> {
                root: &'a Path,
                name: &'a str,
                class_name: &'a str,
                exposed_module: String,
                library_name: &'a str,
                files: &'a [PathBuf],
            }
            format_json(&ScaffoldOutput {
                root: &report.root,
                name: report.names.name(),
                class_name: report.names.class_name(),
                exposed_module: report.names.exposed_module(),
                library_name: report.names.library_name(),
                files: &report.files,
            })
        }
    }
}

/// Formats the result of `pack`.
#[must_use]
pub fn format_pack(report: &PackReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "Packed {} v{} ({} files) into {}",
                report.plugin,
                report.version,
                report.entries,
                report.path.display()
            );
            let _ = writeln!(
                output,
                "  Size: {} -> {}",
                format_size(report.raw_size),
                format_size(report.archive_size)
            );
            output
        }
        OutputFormat::Json => format_json(report),
    }
}

/// Formats an archive listing.
#[must_use]
pub fn format_entries(entries: &[EntrySummary], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if entries.is_empty() {
                return "Archive is empty.\n".to_string();
            }
            let mut output = String::new();
            let _ = writeln!(output, "{:<12} Name", "Size");
            output.push_str(&"-".repeat(50));
            output.push('\n');
            for entry in entries {
                let _ = writeln!(output, "{:<12} {}", format_size(entry.size), entry.name);
            }
            let _ = writeln!(output, "\n{} entries", entries.len());
            output
        }
        OutputFormat::Json => format_json(&entries),
    }
}

/// Formats the files written by `unpack`.
#[must_use]
pub fn format_extracted(dir: &Path, files: &[PathBuf], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Extracted {} files to {}", files.len(), dir.display());
            for file in files {
                let _ = writeln!(output, "  {}", file.display());
            }
            output
        }
        OutputFormat::Json => format_json(&serde_json::json!({
            "dir": dir,
            "files": files,
        })),
    }
}

/// Formats an error for the chosen output format.
#[must_use]
pub fn format_error(err: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => err.to_string(),
        OutputFormat::Json => format_json(&serde_json::json!({
            "success": false,
            "error": err.to_string(),
        })),
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
