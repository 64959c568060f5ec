//! Utility functions and helpers.
//!
//! Small pieces shared across the crate: epoch timestamps, mtime
//! extraction, and tilde expansion for user-supplied paths.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Returns the current timestamp as seconds since the Unix epoch.
#[must_use]
pub fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Modification time of `path` as fractional epoch seconds.
///
/// # Errors
///
/// Returns an error if the file cannot be stat'ed (vanished, permission
/// denied) or reports an mtime before the epoch.
pub fn file_mtime(path: &Path) -> Result<f64> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    let modified = metadata
        .modified()
        .with_context(|| format!("No modification time for {}", path.display()))?;
    let since_epoch = modified
        .duration_since(UNIX_EPOCH)
        .with_context(|| format!("Pre-epoch mtime on {}", path.display()))?;
    Ok(since_epoch.as_secs_f64())
}

/// Expands a path starting with `~` to the user's home directory.
///
/// # Errors
///
/// Returns an error if the path is empty.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path.is_empty() {
        anyhow::bail!("Path cannot be empty");
    }
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return Ok(home.join(&path[2..]));
    }
    Ok(PathBuf::from(path))
}
