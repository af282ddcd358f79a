use serde::{Deserialize, Serialize};

/// Database location for a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    /// Path to the workspace database file (typically relative to workspace root).
    pub path: String,
}

impl DbConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Serializable configuration describing a doxsearch workspace.
///
/// This lives at `.doxsearch/workspace.json` in the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Human-friendly workspace name.
    pub name: String,
    /// Optional description / notes.
    pub description: Option<String>,
    /// Schema/config version. This is about the config format, not the index format.
    pub config_version: String,
    /// Database configuration (path is typically relative to workspace root).
    pub db: DbConfig,
    /// Default generated `search/` directory to import from when none is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_dir: Option<String>,
}

impl WorkspaceConfig {
    /// Create a new workspace configuration using the given name and db path.
    pub fn new(name: impl Into<String>, db_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            db: DbConfig::new(db_path),
            index_dir: None,
        }
    }

    pub fn with_index_dir(mut self, index_dir: Option<String>) -> Self {
        self.index_dir = index_dir;
        self
    }
}
