//! `doxsearch` CLI library: command implementations plus the path helpers they share.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod commands;

fn current_dir() -> Result<PathBuf> {
    env::current_dir().context("Failed to get current directory")
}

/// Resolve `root` to an absolute path.
///
/// `.` maps to the working directory. Paths that do not exist yet (a fresh
/// `init` target) are joined onto the working directory instead of failing.
pub fn canonicalize_or_current(root: &str) -> Result<PathBuf> {
    let path = Path::new(root);
    if path == Path::new(".") {
        return current_dir();
    }
    match path.canonicalize() {
        Ok(resolved) => Ok(resolved),
        Err(_) => Ok(current_dir()?.join(path)),
    }
}

/// Workspace name derived from the root's last component, or `unnamed-workspace`.
pub fn infer_workspace_name(root: &Path) -> String {
    root.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "unnamed-workspace".to_string())
}
