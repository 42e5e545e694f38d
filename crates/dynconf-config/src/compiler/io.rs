//! IO helpers for reading model files from disk.

use crate::CompileError;
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read a file that may legitimately be absent.
pub(super) fn read_optional(path: &Path) -> Result<Option<String>, CompileError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("optional config not found (path={})", path.display());
            Ok(None)
        }
        Err(source) => Err(CompileError::io(path, source)),
    }
}

/// Read a file that must exist.
pub(super) fn read_required(path: &Path) -> Result<String, CompileError> {
    debug!("reading config (path={})", path.display());
    fs::read_to_string(path).map_err(|source| CompileError::io(path, source))
}

/// List regular files directly under `dir` with the given extension, sorted.
pub(super) fn list_config_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, CompileError> {
    let entries = fs::read_dir(dir).map_err(|source| CompileError::io(dir, source))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CompileError::io(dir, source))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| CompileError::io(&path, source))?;
        let is_file = if file_type.is_symlink() {
            path.is_file()
        } else {
            file_type.is_file()
        };
        if !is_file {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    debug!(
        "discovered config files (dir={}, count={})",
        dir.display(),
        files.len()
    );
    Ok(files)
}
