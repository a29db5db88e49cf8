//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::template::scaffold::DEFAULT_BUILD_COMMAND;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// npdk: Notex plugin development kit.
///
/// Scaffolds module-federation UI plugins, packs their build output into
/// `.notex.plugin` archives, and rebuilds them on change.
#[derive(Parser, Debug)]
#[command(name = "npdk")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true, env = "NPDK_FORMAT")]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new plugin project.
    Init {
        /// Plugin name (e.g. `foo-bar`); the class is named in Pascal case.
        #[arg(short, long, default_value = "plugin")]
        name: String,

        /// Project directory (default: ./<name>).
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Build command recorded in plugin.conf.toml.
        #[arg(short, long, default_value = DEFAULT_BUILD_COMMAND)]
        build_command: String,

        /// Generate into a non-empty directory, overwriting template files.
        #[arg(short, long)]
        force: bool,
    },

    /// Pack a build output directory into a plugin archive.
    Pack {
        /// Build output directory (default: ./dist).
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Directory the archive is written to (default: current directory).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract a plugin archive.
    Unpack {
        /// Path to the `.notex.plugin` file.
        file: PathBuf,

        /// Output directory (default: archive name without extension).
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// List the contents of a plugin archive.
    #[command(alias = "ls")]
    Inspect {
        /// Path to the `.notex.plugin` file.
        file: PathBuf,
    },

    /// Rebuild and repack the plugin whenever its sources change.
    Watch {
        /// Project root containing plugin.conf.toml.
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Build output directory (default: <root>/dist).
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Quiet period in milliseconds before rebuilding.
        #[arg(long, default_value = "1000")]
        debounce_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_init_defaults() {
        let cli = Cli::try_parse_from(["npdk", "init"]).unwrap();
        match cli.command {
            Commands::Init {
                name,
                dir,
                build_command,
                force,
            } => {
                assert_eq!(name, "plugin");
                assert!(dir.is_none());
                assert_eq!(build_command, "npm run build");
                assert!(!force);
            }
            other => unreachable!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["npdk", "inspect", "a.notex.plugin", "--format", "json", "-v"])
            .unwrap();
        assert_eq!(cli.format, "json");
        assert!(cli.verbose);
    }

    #[test]
    fn test_watch_args() {
        let cli =
            Cli::try_parse_from(["npdk", "watch", "--root", "proj", "--debounce-ms", "250"]).unwrap();
        match cli.command {
            Commands::Watch {
                root, debounce_ms, ..
            } => {
                assert_eq!(root, PathBuf::from("proj"));
                assert_eq!(debounce_ms, 250);
            }
            other => unreachable!("unexpected command {other:?}"),
        }
    }
}
