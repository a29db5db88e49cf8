//! Template rendering.
//!
//! Templates use Tera's `{{ ident }}` syntax. Rendering is strict: a variable
//! without a value is an error, and the output is checked for leftover
//! template syntax before it is returned.

use crate::error::{Result, TemplateError};
use crate::naming::PluginNames;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tera::{Context, Tera};

// Pattern is a literal; a failure here is a programming error.
#[allow(clippy::expect_used)]
fn residual_regex() -> &'static Regex {
    static RESIDUAL: OnceLock<Regex> = OnceLock::new();
    RESIDUAL.get_or_init(|| Regex::new(r"\{\{[^{}]*\}\}").expect("valid regex"))
}

/// Placeholder key for the raw plugin name.
pub const PLUGIN_NAME: &str = "pluginName";

/// Placeholder key for the Pascal-case plugin name.
pub const PLUGIN_NAME_PASCAL: &str = "pluginNamePascalCase";

/// Placeholder key for the build command stored in the manifest.
pub const BUILD_COMMAND: &str = "buildCommand";

/// Values available to templates during rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the context used for plugin projects.
    #[must_use]
    pub fn for_plugin(names: &PluginNames, build_command: &str) -> Self {
        let mut ctx = Self::new();
        ctx.insert(PLUGIN_NAME, names.name());
        ctx.insert(PLUGIN_NAME_PASCAL, names.pascal());
        ctx.insert(BUILD_COMMAND, build_command);
        ctx
    }

    /// Sets a placeholder value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Looks up a placeholder value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn to_tera(&self) -> Context {
        let mut ctx = Context::new();
        for (key, value) in &self.values {
            ctx.insert(key.as_str(), value);
        }
        ctx
    }
}

/// Renders `source`, substituting every placeholder from `ctx`.
///
/// `template` names the template in the engine and in error messages.
///
/// # Errors
///
/// Returns [`TemplateError::Render`] if the template doesn't parse or uses a
/// variable missing from the context, and [`TemplateError::Unresolved`] if
/// any `{{ .. }}` sequence survives (including ones introduced by values).
pub fn render(template: &str, source: &str, ctx: &TemplateContext) -> Result<String> {
    let render_error = |err: &tera::Error| TemplateError::Render {
        template: template.to_string(),
        reason: error_chain(err),
    };

    let mut tera = Tera::default();
    tera.add_raw_template(template, source)
        .map_err(|e| render_error(&e))?;
    let output = tera
        .render(template, &ctx.to_tera())
        .map_err(|e| render_error(&e))?;

    let remaining = find_residual_placeholders(&output);
    if !remaining.is_empty() {
        return Err(TemplateError::Unresolved {
            template: template.to_string(),
            remaining: remaining.join(", "),
        }
        .into());
    }

    Ok(output)
}

/// Tera reports the useful detail (the missing variable) in its causes.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Lists every `{{ .. }}` sequence in `text`.
#[must_use]
pub fn find_residual_placeholders(text: &str) -> Vec<String> {
    residual_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
