//! Plugin manifest (`plugin.conf.toml`).
//!
//! The manifest is generated by `npdk init`, copied into the build output by
//! the bundler, and read back by `pack` (archive name) and `watch` (build
//! command).

use crate::error::{ManifestError, Result};
use crate::io::read_file;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the plugin manifest.
pub const MANIFEST_FILE: &str = "plugin.conf.toml";

/// Parsed `plugin.conf.toml`.
///
/// # Examples
///
/// ```
/// use npdk::manifest::PluginManifest;
///
/// let manifest = PluginManifest::from_toml_str(r#"
///     [package]
///     name = "foo-bar"
///     version = "0.1.0"
///     exposes = ["./FooBar"]
///
///     [profile]
///     build = "npm run build"
/// "#).unwrap();
/// assert_eq!(manifest.archive_file_name(), "foo-bar.notex.plugin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Package identity.
    pub package: Package,
    /// Build settings.
    pub profile: Profile,
}

/// `[package]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Plugin name; also names the packed archive.
    pub name: String,
    /// Plugin version.
    pub version: String,
    /// Federated module paths the plugin exposes, e.g. `./FooBar`.
    #[serde(default)]
    pub exposes: Vec<String>,
}

/// `[profile]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Shell command that rebuilds the plugin.
    pub build: String,
}

impl PluginManifest {
    /// Parses and validates a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error on TOML syntax errors, missing fields, or values that
    /// fail [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(text).map_err(ManifestError::from)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Reads and validates a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NotFound`] if `path` does not exist, otherwise
    /// the errors of [`from_toml_str`](Self::from_toml_str).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ManifestError::NotFound {
                location: path.display().to_string(),
            }
            .into());
        }
        Self::from_toml_str(&read_file(path)?)
    }

    /// Loads `plugin.conf.toml` from a project directory.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ManifestError::NotFound {
                location: dir.display().to_string(),
            }
            .into());
        }
        Self::load(path)
    }

    /// Checks field values.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &str, reason: &str| -> Result<()> {
            Err(ManifestError::Invalid {
                field: field.to_string(),
                reason: reason.to_string(),
            }
            .into())
        };

        let name = self.package.name.trim();
        if name.is_empty() {
            return invalid("package.name", "must not be empty");
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return invalid("package.name", "must be usable as a file name");
        }
        if self.package.version.trim().is_empty() {
            return invalid("package.version", "must not be empty");
        }
        if let Some(bad) = self.package.exposes.iter().find(|e| !e.starts_with("./")) {
            return invalid("package.exposes", &format!("'{bad}' must start with './'"));
        }
        if self.profile.build.trim().is_empty() {
            return invalid("profile.build", "must not be empty");
        }

        Ok(())
    }

    /// File name of the packed archive, `<name>.notex.plugin`.
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        format!(
            "{}.{}",
            self.package.name.trim(),
            crate::archive::ARCHIVE_EXTENSION
        )
    }
}
