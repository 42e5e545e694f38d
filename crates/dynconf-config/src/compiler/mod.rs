//! Model config compilation pipeline.
//!
//! Every document goes through the same stages in order: raw text is hydrated
//! with variables, normalized from JSON5, validated against its schema, and
//! bound to a typed model. A failing stage ends the compilation and its error
//! is returned unchanged; nothing past it runs.

mod aggregate;
mod bind;
mod hydrate;
mod io;
mod normalize;


pub use normalize::normalize;

use crate::validate::validate;
use crate::{
    CompileError, CompiledModel, CompilerOptions, ConfigKind, SchemaRegistry, SecurityConfig,
    TableConfig, Variables,
};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Origin label for text compiled from memory.
const INLINE_ORIGIN: &str = "<inline>";

/// Stages of a single compilation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Raw,
    Hydrated,
    Normalized,
    Validated,
    Bound,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Raw => "raw",
            Stage::Hydrated => "hydrated",
            Stage::Normalized => "normalized",
            Stage::Validated => "validated",
            Stage::Bound => "bound",
        };
        f.write_str(name)
    }
}

/// Tracks the current stage of one document for logging.
struct Pipeline<'a> {
    kind: ConfigKind,
    origin: &'a str,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    fn new(kind: ConfigKind, origin: &'a str) -> Self {
        Self {
            kind,
            origin,
            stage: Stage::Raw,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stages only move forward");
        debug!(
            "{} config {} -> {} (origin={})",
            self.kind, self.stage, next, self.origin
        );
        self.stage = next;
    }
}

/// Compiles model directories and in-memory config text.
#[derive(Debug, Clone)]
pub struct ModelCompiler {
    registry: Arc<SchemaRegistry>,
    options: CompilerOptions,
}

impl ModelCompiler {
    /// Create a compiler with default options.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self::with_options(registry, CompilerOptions::default())
    }

    /// Create a compiler with explicit options.
    pub fn with_options(registry: Arc<SchemaRegistry>, options: CompilerOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Compile `base/variables.json5`. Returns `None` when the file is absent.
    pub fn load_variables(&self, base: impl AsRef<Path>) -> Result<Option<Variables>, CompileError> {
        let path = base.as_ref().join(&self.options.variables_file);
        let Some(contents) = io::read_optional(&path)? else {
            return Ok(None);
        };
        let origin = path.display().to_string();
        self.compile(ConfigKind::Variable, &contents, None, &origin)
            .map(Some)
    }

    /// Compile `base/security.json5`. Returns `None` when the file is absent.
    pub fn load_security(
        &self,
        base: impl AsRef<Path>,
        variables: &Variables,
    ) -> Result<Option<SecurityConfig>, CompileError> {
        let path = base.as_ref().join(&self.options.security_file);
        let Some(contents) = io::read_optional(&path)? else {
            return Ok(None);
        };
        let origin = path.display().to_string();
        self.compile(ConfigKind::Security, &contents, Some(variables), &origin)
            .map(Some)
    }

    /// Compile a whole model directory: variables, security, then tables.
    pub fn load_model(&self, base: impl AsRef<Path>) -> Result<CompiledModel, CompileError> {
        let base = base.as_ref();
        info!("compiling model directory: {}", base.display());
        let variables = self.load_variables(base)?.unwrap_or_default();
        let security = self.load_security(base, &variables)?;
        let tables = self.load_tables(base, &variables)?;
        info!(
            "model compiled (variables={}, security={}, tables={})",
            variables.len(),
            security.is_some(),
            tables.len()
        );
        Ok(CompiledModel {
            variables,
            security,
            tables,
        })
    }

    /// Compile table config text held in memory.
    pub fn compile_tables_str(
        &self,
        contents: &str,
        variables: &Variables,
    ) -> Result<TableConfig, CompileError> {
        self.compile_tables(contents, variables, INLINE_ORIGIN)
    }

    /// Compile security config text held in memory.
    pub fn compile_security_str(
        &self,
        contents: &str,
        variables: &Variables,
    ) -> Result<SecurityConfig, CompileError> {
        self.compile(ConfigKind::Security, contents, Some(variables), INLINE_ORIGIN)
    }

    /// Compile variables text held in memory.
    pub fn compile_variables_str(&self, contents: &str) -> Result<Variables, CompileError> {
        self.compile(ConfigKind::Variable, contents, None, INLINE_ORIGIN)
    }

    /// Substitute variable references without parsing the result.
    pub fn resolve_variables(
        &self,
        contents: &str,
        variables: &Variables,
    ) -> Result<String, CompileError> {
        hydrate::hydrate(contents, variables, self.options.missing_variables)
    }

    fn compile_tables(
        &self,
        contents: &str,
        variables: &Variables,
        origin: &str,
    ) -> Result<TableConfig, CompileError> {
        self.compile(ConfigKind::Table, contents, Some(variables), origin)
    }

    /// Run one document through every stage. `variables` of `None` skips
    /// substitution, which is how the variables file itself is compiled.
    fn compile<T: DeserializeOwned>(
        &self,
        kind: ConfigKind,
        contents: &str,
        variables: Option<&Variables>,
        origin: &str,
    ) -> Result<T, CompileError> {
        let mut pipeline = Pipeline::new(kind, origin);
        let result = self.run(&mut pipeline, contents, variables);
        if let Err(err) = &result {
            warn!(
                "{kind} config failed after {} stage (origin={origin}): {err}",
                pipeline.stage
            );
        }
        result
    }

    fn run<T: DeserializeOwned>(
        &self,
        pipeline: &mut Pipeline<'_>,
        contents: &str,
        variables: Option<&Variables>,
    ) -> Result<T, CompileError> {
        let hydrated = match variables {
            Some(variables) => Cow::Owned(self.resolve_variables(contents, variables)?),
            None => Cow::Borrowed(contents),
        };
        pipeline.advance(Stage::Hydrated);

        let value = normalize::parse_relaxed(&hydrated, pipeline.origin)?;
        drop(hydrated);
        pipeline.advance(Stage::Normalized);

        validate(&self.registry, pipeline.kind, &value)?.into_result(pipeline.origin)?;
        pipeline.advance(Stage::Validated);

        let bound = bind::bind(pipeline.kind, value)?;
        pipeline.advance(Stage::Bound);
        Ok(bound)
    }
}
