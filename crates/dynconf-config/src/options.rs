//! Compiler options: file locations and template policy.

use crate::CompileError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default variables file name under a model directory.
pub const DEFAULT_VARIABLES_FILE: &str = "variables.json5";
/// Default security file name under a model directory.
pub const DEFAULT_SECURITY_FILE: &str = "security.json5";
/// Default subdirectory holding table configs.
pub const DEFAULT_TABLE_DIR: &str = "tables";
/// Extension identifying table config files.
pub const DEFAULT_TABLE_EXTENSION: &str = "json5";

/// How hydration treats a reference to an undefined variable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingVariablePolicy {
    /// Fail with `UnresolvedVariable`.
    #[default]
    Error,
    /// Substitute an empty string.
    Empty,
}

/// Options controlling where model files live and how they are compiled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompilerOptions {
    #[serde(default = "default_variables_file")]
    pub variables_file: String,
    #[serde(default = "default_security_file")]
    pub security_file: String,
    #[serde(default = "default_table_dir")]
    pub table_dir: String,
    #[serde(default = "default_table_extension")]
    pub table_extension: String,
    #[serde(default)]
    pub missing_variables: MissingVariablePolicy,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            variables_file: default_variables_file(),
            security_file: default_security_file(),
            table_dir: default_table_dir(),
            table_extension: default_table_extension(),
            missing_variables: MissingVariablePolicy::default(),
        }
    }
}

fn default_variables_file() -> String {
    DEFAULT_VARIABLES_FILE.to_string()
}

fn default_security_file() -> String {
    DEFAULT_SECURITY_FILE.to_string()
}

fn default_table_dir() -> String {
    DEFAULT_TABLE_DIR.to_string()
}

fn default_table_extension() -> String {
    DEFAULT_TABLE_EXTENSION.to_string()
}

impl CompilerOptions {
    /// Load options from a JSON5 file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, CompileError> {
        let path = path.as_ref();
        info!("loading compiler options from path: {}", path.display());
        let contents =
            fs::read_to_string(path).map_err(|source| CompileError::io(path, source))?;
        Self::load_from_str(&contents)
    }

    /// Load options from JSON5 contents. Absent keys take their defaults.
    pub fn load_from_str(contents: &str) -> Result<Self, CompileError> {
        debug!("loading compiler options from raw contents (len={})", contents.len());
        let options: Self = json5::from_str(contents)
            .map_err(|err| CompileError::InvalidOptions(err.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Replace the hydration policy.
    pub fn with_missing_variables(mut self, policy: MissingVariablePolicy) -> Self {
        self.missing_variables = policy;
        self
    }

    /// Replace the table subdirectory name.
    pub fn with_table_dir(mut self, table_dir: impl Into<String>) -> Self {
        self.table_dir = table_dir.into();
        self
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), CompileError> {
        for (key, value) in [
            ("variables_file", &self.variables_file),
            ("security_file", &self.security_file),
            ("table_dir", &self.table_dir),
            ("table_extension", &self.table_extension),
        ] {
            if value.trim().is_empty() {
                return Err(CompileError::InvalidOptions(format!("{key} must not be empty")));
            }
        }
        if self.table_extension.starts_with('.') {
            return Err(CompileError::InvalidOptions(
                "table_extension must not start with '.'".to_string(),
            ));
        }
        Ok(())
    }
}
