use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use doxsearch_core::db::WorkspaceContext;
use doxsearch_core::services::{import_path, ImportStatus};

use crate::canonicalize_or_current;

/// Import an index file or `search/` directory into the workspace database.
///
/// Without an explicit path, the workspace's configured `index_dir` is used.
pub fn import_command(root: &str, path: Option<String>, force: bool, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = WorkspaceContext::from_root(&root_path)?;

    let source: PathBuf = match path.or_else(|| ctx.config.index_dir.clone()) {
        Some(p) => ctx.layout.resolve(p),
        None => bail!("No index path given and workspace config has no index_dir"),
    };

    let summary = import_path(&ctx, &source, force)
        .with_context(|| format!("Failed to import {}", source.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Import from {}:", source.display());
        for outcome in &summary.outcomes {
            let id = outcome.snapshot_id.map(|id| format!(" (snapshot {id})")).unwrap_or_default();
            println!(
                "  - {} [{}]{}: {} entries, {}",
                outcome.source,
                outcome.status.as_str(),
                id,
                outcome.entries,
                outcome.report
            );
            if outcome.status == ImportStatus::Rejected {
                for issue in outcome.report.errors() {
                    println!("      {}", issue);
                }
            }
        }
        println!(
            "Stored: {}, skipped: {}, rejected: {}",
            summary.stored(),
            summary.count(ImportStatus::Skipped),
            summary.count(ImportStatus::Rejected)
        );
    }

    let rejected = summary.count(ImportStatus::Rejected);
    if rejected > 0 {
        bail!("{rejected} file(s) rejected due to validation errors");
    }
    Ok(())
}

/// List imported snapshots.
pub fn list_snapshots_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = WorkspaceContext::from_root(&root_path)?;
    let snapshots = ctx.db.list_snapshots().context("Failed to list snapshots")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("Snapshots: (none)");
        return Ok(());
    }

    println!("Snapshots:");
    for snap in snapshots {
        let origin = match (&snap.record.category, &snap.record.bucket) {
            (Some(category), Some(bucket)) => format!(" [{category}/{bucket}]"),
            _ => String::new(),
        };
        println!(
            "  #{} {}{}: {} entries, {} occurrences, imported {}",
            snap.id,
            snap.record.source,
            origin,
            snap.entry_count,
            snap.occurrence_count,
            snap.record.imported_at
        );
    }
    Ok(())
}

/// Delete one snapshot (and its symbols) from the workspace database.
pub fn remove_snapshot_command(root: &str, id: i64) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = WorkspaceContext::from_root(&root_path)?;

    let removed = ctx.db.delete_snapshot(id).context("Failed to delete snapshot")?;
    if !removed {
        return Err(anyhow!("Snapshot {id} not found"));
    }
    tracing::info!(id, "removed snapshot");
    println!("Removed snapshot {id}");
    Ok(())
}
