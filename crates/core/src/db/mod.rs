//! Workspace database integration and workspace layout definitions.
//!
//! A workspace is a directory holding a `.doxsearch/` metadata folder with:
//! - `workspace.json`: serializable workspace configuration.
//! - `index.db`: a SQLite database of imported index snapshots.
//!
//! This module defines:
//! - `WorkspaceConfig` / `DbConfig`: serializable workspace metadata.
//! - `WorkspaceLayout`: computed paths for workspace directories/files.
//! - `IndexDb`: a small SQLite wrapper with versioned schema migrations.
//! - Record types (`SnapshotRecord`, `StoredMatch`) stored in the database.

pub mod config;
pub mod context;
pub mod index_db;
pub mod layout;
pub mod models;
pub mod util;

pub use config::{DbConfig, WorkspaceConfig};
pub use context::WorkspaceContext;
pub use index_db::{DbError, DbResult, IndexDb, CURRENT_SCHEMA_VERSION};
pub use layout::WorkspaceLayout;
pub use models::{SnapshotRecord, StoredMatch, StoredSnapshot};
pub use util::{load_workspace_config, open_workspace_db, resolve_db_path};
