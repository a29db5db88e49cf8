//! Plugin naming rules.
//!
//! A plugin is identified by a user-supplied name such as `foo-bar`. The name
//! itself becomes the npm package name and the federation container name; the
//! class name, exposed module path and global library name come from its
//! Pascal-case form.

use crate::error::{Result, TemplateError};
use convert_case::{Case, Casing};
use serde::Serialize;

/// A validated plugin name together with its derived identifiers.
///
/// # Examples
///
/// ```
/// use npdk::naming::PluginNames;
///
/// let names = PluginNames::new("foo-bar").unwrap();
/// assert_eq!(names.pascal(), "FooBar");
/// assert_eq!(names.exposed_module(), "./FooBar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginNames {
    name: String,
    pascal: String,
}

impl PluginNames {
    /// Validates `name` and derives its Pascal-case form.
    ///
    /// Leading and trailing whitespace is ignored. The name must start with a
    /// lowercase ASCII letter and may otherwise contain lowercase letters,
    /// digits, `-` and `_`, which keeps it a valid npm package name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidName`] when the name is unusable.
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        let invalid = |reason: &str| TemplateError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let Some(first) = name.chars().next() else {
            return Err(invalid("must not be empty").into());
        };
        if !first.is_ascii_lowercase() {
            return Err(invalid("must start with a lowercase letter").into());
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_')))
        {
            return Err(invalid(&format!(
                "unsupported character '{c}' (use lowercase letters, digits, '-' or '_')"
            ))
            .into());
        }

        Ok(Self {
            name: name.to_string(),
            pascal: to_pascal_case(name),
        })
    }

    /// The plugin name as entered (trimmed).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pascal-case form, e.g. `FooBar`.
    #[must_use]
    pub fn pascal(&self) -> &str {
        &self.pascal
    }

    /// Name of the generated entry-point class.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.pascal
    }

    /// Global variable name the federated library is exported under.
    #[must_use]
    pub fn library_name(&self) -> &str {
        &self.pascal
    }

    /// Module path exposed through module federation, e.g. `./FooBar`.
    #[must_use]
    pub fn exposed_module(&self) -> String {
        format!("./{}", self.pascal)
    }
}

/// Converts an arbitrary name to `PascalCase`.
///
/// ```
/// assert_eq!(npdk::naming::to_pascal_case("my_plugin v2"), "MyPluginV2");
/// ```
#[must_use]
pub fn to_pascal_case(input: &str) -> String {
    input.to_case(Case::Pascal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("foo-bar", "FooBar"; "kebab")]
    #[test_case("foo_bar", "FooBar"; "snake")]
    #[test_case("foo bar", "FooBar"; "spaced")]
    #[test_case("fooBar", "FooBar"; "camel")]
    #[test_case("FooBar", "FooBar"; "already pascal")]
    #[test_case("FOO-BAR", "FooBar"; "shouting")]
    #[test_case("my_plugin v2", "MyPluginV2"; "mixed separators")]
    #[test_case("", ""; "empty")]
    fn test_to_pascal_case(input: &str, expected: &str) {
        assert_eq!(to_pascal_case(input), expected);
    }

    #[test]
    fn test_derived_names() {
        let names = PluginNames::new("foo-bar").unwrap();
        assert_eq!(names.name(), "foo-bar");
        assert_eq!(names.class_name(), "FooBar");
        assert_eq!(names.library_name(), "FooBar");
        assert_eq!(names.exposed_module(), "./FooBar");
    }

    #[test]
    fn test_snake_name() {
        let names = PluginNames::new("note_graph2").unwrap();
        assert_eq!(names.name(), "note_graph2");
        assert!(names.class_name().starts_with("NoteGraph"));
    }

    #[test]
    fn test_name_is_trimmed() {
        let names = PluginNames::new("  notes  ").unwrap();
        assert_eq!(names.name(), "notes");
        assert_eq!(names.pascal(), "Notes");
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "blank")]
    #[test_case("9lives"; "leading digit")]
    #[test_case("Foo Bar"; "spaces and capitals")]
    #[test_case("fooBar"; "camel")]
    #[test_case("foo bar"; "space")]
    #[test_case("-foo"; "leading hyphen")]
    #[test_case("_foo"; "leading underscore")]
    #[test_case("foo/bar"; "slash")]
    #[test_case("foo'bar"; "quote")]
    #[test_case("{{x}}"; "template syntax")]
    #[test_case("---"; "only separators")]
    fn test_invalid_names(input: &str) {
        assert!(PluginNames::new(input).is_err());
    }
}
