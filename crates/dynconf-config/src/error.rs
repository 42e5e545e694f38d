//! Error types for model config compilation.

use crate::ConfigKind;
use crate::validate::Violation;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned while compiling model configs.
#[derive(Debug, Error)]
pub enum CompileError {
    /// An expected file or directory does not exist.
    #[error("config not found: {}", path.display())]
    MissingFile { path: PathBuf },
    /// Reading a file or listing a directory failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Relaxed-syntax parsing failed.
    #[error("malformed config text in {origin}: {message}")]
    MalformedConfigText { origin: String, message: String },
    /// A template references a variable that is not defined.
    #[error("unresolved variable: {name}")]
    UnresolvedVariable { name: String },
    /// The registry holds no schema for the requested kind.
    #[error("no {0} schema is loaded")]
    SchemaNotLoaded(ConfigKind),
    /// A schema document could not be compiled.
    #[error("failed to load {kind} schema: {message}")]
    SchemaLoad { kind: ConfigKind, message: String },
    /// Data does not conform to its schema.
    #[error("invalid {kind} config in {origin}: {}", summarize(violations))]
    ValidationFailed {
        kind: ConfigKind,
        origin: String,
        violations: Vec<Violation>,
    },
    /// Validated data could not be mapped onto the typed model.
    #[error("failed to bind {kind} config: {source}")]
    BindingError {
        kind: ConfigKind,
        #[source]
        source: serde_json::Error,
    },
    /// Compiler options failed to parse.
    #[error("invalid compiler options: {0}")]
    InvalidOptions(String),
}

impl CompileError {
    /// Map an IO failure on `path`, keeping absence distinct from other errors.
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            CompileError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            CompileError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Violations carried by a validation failure, empty for other errors.
    pub fn violations(&self) -> &[Violation] {
        match self {
            CompileError::ValidationFailed { violations, .. } => violations.as_slice(),
            _ => &[],
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| violation.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
