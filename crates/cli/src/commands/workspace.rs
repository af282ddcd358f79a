use std::fs;

use anyhow::{Context, Result};
use doxsearch_core::db::{
    open_workspace_db, IndexDb, StoredSnapshot, WorkspaceConfig, WorkspaceLayout,
};
use serde::Serialize;

use crate::commands::print_dir_status;
use crate::{canonicalize_or_current, infer_workspace_name};

#[derive(Serialize)]
pub struct WorkspaceInfoSnapshot {
    pub name: String,
    pub description: Option<String>,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub db_path: String,
    pub index_dir: Option<String>,
    pub symbol_count: usize,
    pub snapshots: Vec<StoredSnapshot>,
}

/// Initialize a new workspace at `root`.
pub fn init_workspace_command(
    root: &str,
    name: Option<String>,
    index_dir: Option<String>,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = WorkspaceLayout::new(&root_path);

    // Derive workspace name if not provided.
    let workspace_name = match name {
        Some(n) => n,
        None => infer_workspace_name(&root_path),
    };

    // Ensure directories exist.
    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    fs::create_dir_all(&layout.reports_dir).with_context(|| {
        format!("Failed to create reports dir: {}", layout.reports_dir.display())
    })?;

    // Build workspace config.
    let db_path_rel = layout.db_path_relative_string();
    let config = WorkspaceConfig::new(&workspace_name, db_path_rel).with_index_dir(index_dir);

    // Serialize and write config JSON.
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&layout.config_path, json).with_context(|| {
        format!("Failed to write workspace config: {}", layout.config_path.display())
    })?;

    // Create the database immediately so follow-on commands can rely on its presence.
    IndexDb::open(&layout.db_path).with_context(|| {
        format!("Failed to initialize workspace database at {}", layout.db_path.display())
    })?;
    tracing::info!(root = %layout.root.display(), "initialized workspace");

    println!("Initialized doxsearch workspace:");
    println!("  Name: {}", workspace_name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  DB path (relative): {}", config.db.path);
    if let Some(dir) = &config.index_dir {
        println!("  Index dir: {}", dir);
    }
    println!("  Reports dir: {}", layout.reports_dir.display());

    Ok(())
}

/// Show basic information about an existing workspace.
pub fn workspace_info_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = WorkspaceLayout::new(&root_path);

    let (config, db_path, db) = open_workspace_db(&layout)?;
    let snapshots = db.list_snapshots().context("Failed to list snapshots")?;
    let symbol_count = db.symbol_count().context("Failed to count symbols")?;

    if json {
        let info = WorkspaceInfoSnapshot {
            name: config.name,
            description: config.description,
            root: layout.root.display().to_string(),
            config_file: layout.config_path.display().to_string(),
            config_version: config.config_version,
            db_path: db_path.display().to_string(),
            index_dir: config.index_dir,
            symbol_count,
            snapshots,
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("doxsearch Workspace Info");
    println!("========================");
    println!("Name: {}", config.name);
    if let Some(desc) = &config.description {
        println!("Description: {}", desc);
    }
    println!("Root: {}", layout.root.display());
    println!("Config file: {}", layout.config_path.display());
    println!("Config version: {}", config.config_version);
    println!("DB path: {}", db_path.display());
    println!("Index dir: {}", config.index_dir.as_deref().unwrap_or("(not set)"));
    println!("Snapshots: {}", snapshots.len());
    println!("Symbols: {}", symbol_count);
    println!();

    println!("Directories:");
    print_dir_status("Meta dir (.doxsearch)", &layout.meta_dir);
    print_dir_status("Reports dir", &layout.reports_dir);

    Ok(())
}
