use std::path::Path;

use anyhow::{anyhow, Context, Result};
use doxsearch_core::db::{open_workspace_db, WorkspaceLayout};
use doxsearch_core::model::SearchIndex;
use doxsearch_core::services::load_index_path;

use crate::canonicalize_or_current;

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// Where read-only commands get their indexes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// Snapshots stored in a workspace database.
    Workspace(String),
    /// An index file or generated `search/` directory on disk.
    Path(String),
}

impl IndexSource {
    /// `--index` wins over `--root`.
    pub fn from_args(root: &str, index: Option<String>) -> Self {
        match index {
            Some(path) => IndexSource::Path(path),
            None => IndexSource::Workspace(root.to_string()),
        }
    }

    /// Load every index reachable from this source, labelled by origin.
    pub fn load(&self) -> Result<Vec<(String, SearchIndex)>> {
        match self {
            IndexSource::Path(path) => {
                let loaded = load_index_path(Path::new(path))
                    .with_context(|| format!("Failed to load index from {path}"))?;
                Ok(loaded.into_iter().map(|l| (l.file_name(), l.index)).collect())
            }
            IndexSource::Workspace(root) => {
                let root_path = canonicalize_or_current(root)?;
                let layout = WorkspaceLayout::new(&root_path);
                let (_config, _db_path, db) = open_workspace_db(&layout)?;
                let mut out = Vec::new();
                for snapshot in db.list_snapshots().context("Failed to list snapshots")? {
                    let index = db
                        .load_snapshot(snapshot.id)
                        .context("Failed to load snapshot")?
                        .ok_or_else(|| anyhow!("Snapshot {} vanished while loading", snapshot.id))?;
                    out.push((snapshot.record.source, index));
                }
                Ok(out)
            }
        }
    }
}
