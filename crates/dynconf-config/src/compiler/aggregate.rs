//! Aggregation of per-file table configs into one deduplicated set.

use super::{ModelCompiler, io};
use crate::{CompileError, TableConfig, Variables};
use log::{debug, info};
use std::path::Path;

impl ModelCompiler {
    /// Compile every table file under the configured table directory.
    pub fn load_tables(
        &self,
        base: impl AsRef<Path>,
        variables: &Variables,
    ) -> Result<TableConfig, CompileError> {
        let table_dir = self.options.table_dir.clone();
        self.load_tables_from(base, variables, &table_dir)
    }

    /// Compile every table file directly under `base/table_dir`.
    ///
    /// Files are compiled in sorted order and the first failure aborts the
    /// whole aggregation. Identical definitions from different files collapse.
    pub fn load_tables_from(
        &self,
        base: impl AsRef<Path>,
        variables: &Variables,
        table_dir: &str,
    ) -> Result<TableConfig, CompileError> {
        let dir = base.as_ref().join(table_dir);
        info!("loading table configs (dir={})", dir.display());
        let files = io::list_config_files(&dir, &self.options.table_extension)?;

        let mut aggregate = TableConfig::default();
        for path in &files {
            let contents = io::read_required(path)?;
            let origin = path.display().to_string();
            let config = self.compile_tables(&contents, variables, &origin)?;
            debug!(
                "table file compiled (path={}, tables={})",
                path.display(),
                config.len()
            );
            aggregate.merge(config);
        }
        info!(
            "table configs loaded (files={}, tables={})",
            files.len(),
            aggregate.len()
        );
        Ok(aggregate)
    }
}
