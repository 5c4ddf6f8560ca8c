//! Code generation for introspected tables.
//!
//! Schema reading and classification know nothing about the framework the
//! generated code targets. Everything framework-specific sits behind
//! [`TargetTemplate`]; [`LumenTemplate`] is the bundled implementation.

pub mod fs_utils;
pub mod lumen;

pub use lumen::LumenTemplate;

use crate::classify::Classification;
use std::fmt;
use std::path::{Path, PathBuf};

/// Everything a template needs to render one table
#[derive(Debug, Clone, Copy)]
pub struct TableContext<'a> {
    pub table: &'a str,
    pub connection: &'a str,
    pub classification: &'a Classification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// One path-to-handler binding in a table's route block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSpec {
    pub method: HttpMethod,
    /// Path below `/<table>/`
    pub path_suffix: &'static str,
    /// Controller action handling the route
    pub action: &'static str,
}

impl RouteSpec {
    pub fn path(&self, table: &str) -> String {
        format!("/{}/{}", table, self.path_suffix)
    }
}

/// The five routes bound for every table, in emission order
pub const ROUTES: [RouteSpec; 5] = [
    RouteSpec { method: HttpMethod::Get, path_suffix: "list", action: "index" },
    RouteSpec { method: HttpMethod::Get, path_suffix: "show/{id}", action: "show" },
    RouteSpec { method: HttpMethod::Post, path_suffix: "register", action: "register" },
    RouteSpec { method: HttpMethod::Post, path_suffix: "update/{id}", action: "update" },
    RouteSpec { method: HttpMethod::Get, path_suffix: "delete/{id}", action: "delete" },
];

/// A rendered file and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

/// Framework-specific rendering of models, controllers and routes.
///
/// Implementations must be pure: identical inputs give byte-identical
/// output. Identifiers are emitted verbatim and never validated.
///
/// # Example
///
/// ```ignore
/// struct MarkdownTarget;
///
/// impl TargetTemplate for MarkdownTarget {
///     fn name(&self) -> &str { "markdown" }
///     fn file_extension(&self) -> &str { "md" }
///     fn render_model(&self, ctx: &TableContext) -> String { /* ... */ }
///     fn render_controller(&self, ctx: &TableContext) -> String { /* ... */ }
///     fn render_routes(&self, ctx: &TableContext) -> String { /* ... */ }
/// }
/// ```
pub trait TargetTemplate {
    /// Short name used in log output
    fn name(&self) -> &str;

    /// Extension of generated source files, without the dot
    fn file_extension(&self) -> &str;

    /// Model type name for a table. Defaults to the table name unchanged.
    fn model_name(&self, table: &str) -> String {
        table.to_string()
    }

    /// Controller type name for a table
    fn controller_name(&self, table: &str) -> String {
        format!("{}Controller", table)
    }

    fn model_file_name(&self, table: &str) -> String {
        format!("{}.{}", self.model_name(table), self.file_extension())
    }

    fn controller_file_name(&self, table: &str) -> String {
        format!("{}.{}", self.controller_name(table), self.file_extension())
    }

    fn render_model(&self, ctx: &TableContext) -> String;

    fn render_controller(&self, ctx: &TableContext) -> String;

    /// Render the route block appended to the shared routing file
    fn render_routes(&self, ctx: &TableContext) -> String;

    /// Model artifact placed under `models_dir`
    fn model_artifact(&self, ctx: &TableContext, models_dir: &Path) -> Artifact {
        Artifact {
            path: models_dir.join(self.model_file_name(ctx.table)),
            contents: self.render_model(ctx),
        }
    }

    /// Controller artifact placed under `controllers_dir`
    fn controller_artifact(&self, ctx: &TableContext, controllers_dir: &Path) -> Artifact {
        Artifact {
            path: controllers_dir.join(self.controller_file_name(ctx.table)),
            contents: self.render_controller(ctx),
        }
    }
}
