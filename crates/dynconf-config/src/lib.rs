//! Compiler for dynamic model configs.
//!
//! This crate turns JSON5 table, security, and variable files into typed,
//! schema-validated models. Table files from one directory are compiled
//! independently and merged into a single deduplicated set.

mod compiler;
mod error;
mod model;
mod options;
mod schema;
mod validate;

/// Compilation pipeline entry points.
pub use compiler::{ModelCompiler, Stage, normalize};
/// Public error type returned by every compilation API.
pub use error::CompileError;
/// Typed config models.
pub use model::*;
/// Compiler options and defaults.
pub use options::{
    CompilerOptions, DEFAULT_SECURITY_FILE, DEFAULT_TABLE_DIR, DEFAULT_TABLE_EXTENSION,
    DEFAULT_VARIABLES_FILE, MissingVariablePolicy,
};
/// Schema registry keyed by config kind.
pub use schema::{ConfigKind, SchemaRegistry, SchemaRegistryBuilder};
/// Validation reports.
pub use validate::{ValidationReport, Violation, validate};
