//! Public SDK surface for dynconf.
//!
//! This crate re-exports the config compiler and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use dynconf_config as config;
pub use dynconf_config::{CompileError, CompiledModel, CompilerOptions, ModelCompiler};

use std::path::Path;
use std::sync::Arc;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}

/// Compile a model directory with the embedded schemas.
pub fn compile_dir(
    base: impl AsRef<Path>,
    options: CompilerOptions,
) -> Result<CompiledModel, CompileError> {
    let registry = Arc::new(config::SchemaRegistry::embedded()?);
    ModelCompiler::with_options(registry, options).load_model(base)
}
