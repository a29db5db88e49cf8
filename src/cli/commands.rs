//! CLI command implementations.
//!
//! Each command returns its output as a string; `main` decides where it goes.

use crate::archive::{ARCHIVE_EXTENSION, Packer, unpack};
use crate::cli::output::{
    OutputFormat, format_entries, format_extracted, format_pack, format_scaffold,
};
use crate::cli::parser::{Cli, Commands};
use crate::error::{CommandError, Result};
use crate::template::{ScaffoldOptions, scaffold};
use crate::watch::{PluginWatcher, WatchOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Executes the CLI command.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Init {
            name,
            dir,
            build_command,
            force,
        } => cmd_init(name, dir.as_deref(), build_command, *force, format),
        Commands::Pack { source, output } => {
            cmd_pack(source.as_deref(), output.as_deref(), format)
        }
        Commands::Unpack { file, out_dir } => cmd_unpack(file, out_dir.as_deref(), format),
        Commands::Inspect { file } => cmd_inspect(file, format),
        Commands::Watch {
            root,
            source,
            debounce_ms,
        } => cmd_watch(root, source.as_deref(), *debounce_ms),
    }
}

// ==================== Command Implementations ====================

fn cmd_init(
    name: &str,
    dir: Option<&Path>,
    build_command: &str,
    force: bool,
    format: OutputFormat,
) -> Result<String> {
    let target = dir.map_or_else(|| PathBuf::from(name.trim()), Path::to_path_buf);
    let options = ScaffoldOptions {
        target,
        name: name.to_string(),
        build_command: build_command.to_string(),
        force,
    };
    let report = scaffold(&options)?;
    Ok(format_scaffold(&report, format))
}

fn cmd_pack(source: Option<&Path>, output: Option<&Path>, format: OutputFormat) -> Result<String> {
    let source = source.map_or_else(|| PathBuf::from("dist"), Path::to_path_buf);
    let output = output.map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let report = Packer::new(&source)?.pack(&output)?;
    Ok(format_pack(&report, format))
}

fn cmd_unpack(file: &Path, out_dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let out_dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_unpack_dir(file)?,
    };

    let archive = unpack(file)?;
    let files = archive.extract(&out_dir)?;
    Ok(format_extracted(&out_dir, &files, format))
}

fn cmd_inspect(file: &Path, format: OutputFormat) -> Result<String> {
    let archive = unpack(file)?;
    Ok(format_entries(&archive.summaries(), format))
}

fn cmd_watch(root: &Path, source: Option<&Path>, debounce_ms: u64) -> Result<String> {
    let mut options = WatchOptions::new(root);
    if let Some(source) = source {
        options.source = source.to_path_buf();
    }
    options.debounce = Duration::from_millis(debounce_ms);

    PluginWatcher::new(options)?.run()?;
    Ok(String::new())
}

/// `foo-bar.notex.plugin` unpacks into `foo-bar` next to the archive.
fn default_unpack_dir(file: &Path) -> Result<PathBuf> {
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CommandError::InvalidArgument(format!("{}", file.display())))?;
    let stem = file_name
        .strip_suffix(&format!(".{ARCHIVE_EXTENSION}"))
        .unwrap_or(file_name);
    if stem.is_empty() || stem == file_name {
        return Err(CommandError::InvalidArgument(format!(
            "cannot derive output directory from {file_name}; pass --out-dir"
        ))
        .into());
    }

    Ok(file.with_file_name(stem))
}
