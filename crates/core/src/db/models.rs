use serde::{Deserialize, Serialize};

/// Metadata describing one imported index file.
///
/// The SHA-256 of the file content is the snapshot's identity: importing the
/// same bytes twice is a no-op unless forced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Where the file was imported from (as given, or relative to the workspace root).
    pub source: String,
    /// Index section (`functions`, `all`, ...), when the file name carried one.
    pub category: Option<String>,
    /// Bucket label from the file name (`9` in `functions_9.js`).
    pub bucket: Option<String>,
    /// Hex SHA-256 of the file content.
    pub sha256: String,
    /// RFC 3339 import timestamp (UTC).
    pub imported_at: String,
}

impl SnapshotRecord {
    pub fn new(source: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            category: None,
            bucket: None,
            sha256: sha256.into(),
            imported_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_origin(mut self, category: Option<String>, bucket: Option<String>) -> Self {
        self.category = category;
        self.bucket = bucket;
        self
    }
}

/// A snapshot row as read back from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    pub id: i64,
    #[serde(flatten)]
    pub record: SnapshotRecord,
    pub entry_count: usize,
    pub occurrence_count: usize,
}

/// A symbol hit from a database-wide search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMatch {
    pub snapshot_id: i64,
    pub source: String,
    pub category: Option<String>,
    pub key: String,
    pub name: String,
    pub occurrences: usize,
}
