use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::db::{SnapshotRecord, WorkspaceContext};
use crate::services::loader::{load_index_path, LoadedIndex};
use crate::validate::ValidationReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Stored as a new snapshot.
    Imported,
    /// Stored, replacing a snapshot with identical content (`force`).
    Replaced,
    /// Identical content already imported; nothing stored.
    Skipped,
    /// Validation errors; nothing stored.
    Rejected,
}

impl ImportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportStatus::Imported => "imported",
            ImportStatus::Replaced => "replaced",
            ImportStatus::Skipped => "skipped",
            ImportStatus::Rejected => "rejected",
        }
    }
}

/// Result of importing a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub source: String,
    pub status: ImportStatus,
    pub snapshot_id: Option<i64>,
    pub entries: usize,
    pub report: ValidationReport,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportSummary {
    pub fn count(&self, status: ImportStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Number of files that ended up stored (new or replaced).
    pub fn stored(&self) -> usize {
        self.count(ImportStatus::Imported) + self.count(ImportStatus::Replaced)
    }
}

/// Import a file or a generated `search/` directory into the workspace database.
///
/// Each file is hashed; a file whose source path and content were already
/// imported is skipped unless `force` is set, in which case the older
/// snapshot is replaced atomically. Files with validation errors are rejected
/// and never stored.
pub fn import_path(ctx: &WorkspaceContext, path: &Path, force: bool) -> Result<ImportSummary> {
    let loaded = load_index_path(path)
        .with_context(|| format!("Failed to load index from {}", path.display()))?;

    let mut summary = ImportSummary::default();
    for file in &loaded {
        let outcome = import_one(ctx, file, force)?;
        tracing::info!(
            source = %outcome.source,
            status = outcome.status.as_str(),
            entries = outcome.entries,
            "import finished"
        );
        summary.outcomes.push(outcome);
    }
    Ok(summary)
}

fn import_one(ctx: &WorkspaceContext, file: &LoadedIndex, force: bool) -> Result<ImportOutcome> {
    let source = source_label(&ctx.layout.root, &file.path);
    let report = file.validate();
    let entries = file.index.len();

    if !report.is_ok() {
        tracing::warn!(source = %source, "{report}; refusing to import");
        return Ok(ImportOutcome {
            source,
            status: ImportStatus::Rejected,
            snapshot_id: None,
            entries,
            report,
        });
    }

    let existing = ctx
        .db
        .find_snapshot(&source, &file.sha256)
        .context("Failed to look up existing snapshot")?;

    if let (Some(snapshot), false) = (&existing, force) {
        tracing::debug!(id = snapshot.id, "content already imported");
        return Ok(ImportOutcome {
            source,
            status: ImportStatus::Skipped,
            snapshot_id: Some(snapshot.id),
            entries,
            report,
        });
    }

    let record = SnapshotRecord::new(&source, &file.sha256).with_origin(
        file.category().map(|c| c.as_str().to_string()),
        file.bucket().map(str::to_string),
    );
    let (status, stored) = match existing {
        Some(snapshot) => {
            (ImportStatus::Replaced, ctx.db.replace_snapshot(snapshot.id, &record, &file.index))
        }
        None => (ImportStatus::Imported, ctx.db.insert_snapshot(&record, &file.index)),
    };
    let id = stored.with_context(|| format!("Failed to store snapshot for {source}"))?;

    Ok(ImportOutcome { source, status, snapshot_id: Some(id), entries, report })
}

/// Path relative to the workspace root when possible.
fn source_label(root: &Path, path: &Path) -> String {
    let relative = path
        .canonicalize()
        .ok()
        .and_then(|abs| {
            root.canonicalize()
                .ok()
                .and_then(|root| abs.strip_prefix(&root).ok().map(|p| p.to_path_buf()))
        })
        .or_else(|| path.strip_prefix(root).ok().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().to_string()
}
