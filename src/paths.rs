//! Path resolution helpers.
//!
//! Supports absolute paths, "~" home directory expansion, and paths
//! relative to a base directory (the presets directory for icon files).

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{DeckError, Result};

/// Resolve a path against a base directory.
///
/// Resolution rules:
/// 1. Paths starting with `~`: expanded to the home directory
/// 2. Absolute paths: used as-is
/// 3. Relative paths: resolved relative to `base_dir`
pub fn resolve_path(path: &Path, base_dir: &Path) -> Result<PathBuf> {
    trace!(path = %path.display(), base = %base_dir.display(), "Resolving path");

    let path_str = path.to_string_lossy();

    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() { home } else { home.join(rest) };
        debug!(resolved = %resolved.display(), "Expanded home directory path");
        return Ok(resolved);
    }

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    Ok(base_dir.join(path))
}

/// Expand a leading `~` without rebasing relative paths.
pub fn expand_user(path: &Path) -> Result<PathBuf> {
    resolve_path(path, Path::new("."))
        .map(|p| p.strip_prefix(".").map_or_else(|_| p.clone(), Path::to_path_buf))
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| DeckError::Other("Could not determine home directory".to_string()))
}
