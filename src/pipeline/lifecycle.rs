//! File lifecycle: mark a fully drained file as processed.

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::config::PROCESSED_PREFIX;

/// Path the file moves to once drained: same directory, base name prefixed
/// with the processed marker.
pub fn processed_path_for(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("no file name in {}", path.display()))?;
    Ok(path
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("{PROCESSED_PREFIX}{name}")))
}

/// Rename a drained file in place with the processed marker. Never deletes.
/// Callers treat failure as non-fatal: the file is simply reprocessed next
/// run, and cache writes are overwrites.
pub fn mark_processed(path: &Path) -> Result<PathBuf> {
    let new_path = processed_path_for(path)?;
    fs::rename(path, &new_path).with_context(|| {
        format!(
            "rename processed file ({} -> {})",
            path.display(),
            new_path.display()
        )
    })?;
    Ok(new_path)
}
