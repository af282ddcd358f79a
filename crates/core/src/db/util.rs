use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::db::{IndexDb, WorkspaceConfig, WorkspaceLayout};

/// Load the workspace config JSON from disk for a given layout.
pub fn load_workspace_config(layout: &WorkspaceLayout) -> Result<WorkspaceConfig> {
    let config_json = std::fs::read_to_string(&layout.config_path).with_context(|| {
        format!("Failed to read workspace config at {}", layout.config_path.display())
    })?;
    let config: WorkspaceConfig =
        serde_json::from_str(&config_json).context("Failed to parse workspace config JSON")?;
    Ok(config)
}

/// Resolve the DB path from the config (relative paths are relative to the workspace root).
pub fn resolve_db_path(layout: &WorkspaceLayout, config: &WorkspaceConfig) -> PathBuf {
    layout.resolve(&config.db.path)
}

/// Resolve the DB path (respecting relative/absolute config) and open an IndexDb.
pub fn open_workspace_db(layout: &WorkspaceLayout) -> Result<(WorkspaceConfig, PathBuf, IndexDb)> {
    let config = load_workspace_config(layout)?;
    let db_path = resolve_db_path(layout, &config);
    let db = IndexDb::open(&db_path)
        .with_context(|| format!("Failed to open workspace database at {}", db_path.display()))?;
    tracing::debug!(db = %db_path.display(), "opened workspace database");
    Ok((config, db_path, db))
}
