//! Project generation for `npdk init`.

use super::render::BUILD_COMMAND;
use super::{PROJECT_TEMPLATES, TemplateContext, render};
use crate::error::{Result, TemplateError};
use crate::io::{ensure_dir, is_dir_empty, write_file};
use crate::naming::PluginNames;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Build command written to the manifest when none is given.
pub const DEFAULT_BUILD_COMMAND: &str = "npm run build";

/// Inputs for generating a plugin project.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Directory the project is generated into.
    pub target: PathBuf,
    /// Plugin name, e.g. `foo-bar`.
    pub name: String,
    /// Command `npdk watch` runs to rebuild the plugin.
    pub build_command: String,
    /// Generate even if `target` already has files in it.
    pub force: bool,
}

impl ScaffoldOptions {
    /// Options for `name` generated into `target` with the default build command.
    #[must_use]
    pub fn new(name: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            name: name.into(),
            build_command: DEFAULT_BUILD_COMMAND.to_string(),
            force: false,
        }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    /// Project root.
    pub root: PathBuf,
    /// Names derived from the plugin name.
    pub names: PluginNames,
    /// Files written, in write order.
    pub files: Vec<PathBuf>,
}

/// Generates a plugin project from the embedded templates.
///
/// All templates are rendered before anything is written, so a rendering
/// failure leaves the target untouched.
///
/// # Errors
///
/// Returns an error if the name is invalid, the build command is empty, the
/// target is not empty (without `force`), a template fails to render, or a
/// file cannot be written.
pub fn scaffold(options: &ScaffoldOptions) -> Result<ScaffoldReport> {
    let names = PluginNames::new(&options.name)?;
    let build_command = options.build_command.trim();
    validate_build_command(build_command)?;

    if !options.force && !is_dir_empty(&options.target)? {
        return Err(TemplateError::TargetNotEmpty {
            path: options.target.display().to_string(),
        }
        .into());
    }

    let ctx = TemplateContext::for_plugin(&names, build_command);
    let rendered = PROJECT_TEMPLATES
        .iter()
        .map(|t| render(t.path, t.source, &ctx).map(|out| (t.path, out)))
        .collect::<Result<Vec<_>>>()?;

    ensure_dir(&options.target)?;

    let mut files = Vec::with_capacity(rendered.len());
    for (rel, content) in rendered {
        let path = rel
            .split('/')
            .fold(options.target.clone(), |acc, part| acc.join(part));
        write_file(&path, content.as_bytes())?;
        debug!(path = %path.display(), "wrote template");
        files.push(path);
    }

    info!(
        plugin = names.name(),
        class = names.class_name(),
        root = %options.target.display(),
        "generated plugin project"
    );

    Ok(ScaffoldReport {
        root: options.target.clone(),
        names,
        files,
    })
}

/// The command lands inside a TOML basic string, so quoting characters are refused.
fn validate_build_command(command: &str) -> Result<()> {
    let reason = if command.is_empty() {
        "must not be empty"
    } else if command.contains(['"', '\\', '\n', '\r']) {
        "must not contain quotes, backslashes or newlines"
    } else {
        return Ok(());
    };

    Err(TemplateError::InvalidValue {
        key: BUILD_COMMAND.to_string(),
        reason: reason.to_string(),
    }
    .into())
}
