//! Plugin project templates.
//!
//! The template set is compiled into the binary so `npdk init` works
//! without any files on disk. Each template carries its output path
//! relative to the new project root.

pub mod render;
pub mod scaffold;

pub use render::{TemplateContext, find_residual_placeholders, render};
pub use scaffold::{ScaffoldOptions, ScaffoldReport, scaffold};

/// A single embedded template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Output path relative to the project root, `/` separated.
    pub path: &'static str,
    /// Raw template text.
    pub source: &'static str,
}

/// Module-federation build configuration.
pub const RSBUILD_CONFIG: Template = Template {
    path: "rsbuild.config.ts",
    source: include_str!("../../templates/rsbuild.config.ts"),
};

/// Plugin manifest consumed by `pack` and `watch`.
pub const PLUGIN_MANIFEST: Template = Template {
    path: "plugin.conf.toml",
    source: include_str!("../../templates/plugin.conf.toml"),
};

/// npm package manifest.
pub const PACKAGE_JSON: Template = Template {
    path: "package.json",
    source: include_str!("../../templates/package.json"),
};

/// TypeScript compiler options.
pub const TSCONFIG: Template = Template {
    path: "tsconfig.json",
    source: include_str!("../../templates/tsconfig.json"),
};

/// Plugin entry point extending the host `Plugin` class.
pub const ENTRY_POINT: Template = Template {
    path: "src/index.tsx",
    source: include_str!("../../templates/src/index.tsx"),
};

/// Root UI component returned by `render`.
pub const APP_COMPONENT: Template = Template {
    path: "src/App.tsx",
    source: include_str!("../../templates/src/App.tsx"),
};

/// Every template written by `npdk init`, in write order.
pub const PROJECT_TEMPLATES: &[Template] = &[
    RSBUILD_CONFIG,
    PLUGIN_MANIFEST,
    PACKAGE_JSON,
    TSCONFIG,
    ENTRY_POINT,
    APP_COMPONENT,
];
