use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::db::{SnapshotRecord, StoredMatch, StoredSnapshot};
use crate::model::{Anchor, IndexCategory, Occurrence, SearchIndex, SymbolEntry};
use crate::search::{SearchMode, SearchQuery};

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for workspace database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for DB operations.
pub type DbResult<T> = Result<T, DbError>;

/// SQLite-backed store of imported index snapshots.
///
/// This is a thin wrapper around `rusqlite::Connection` that is responsible for:
/// - Opening/creating the DB file.
/// - Applying schema migrations.
/// - Providing small, testable helpers for storing and querying snapshots.
#[derive(Debug)]
pub struct IndexDb {
    conn: Connection,
}

impl IndexDb {
    /// Open (or create) a workspace database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Expose a reference to the underlying connection for advanced callers.
    /// For most code, prefer higher-level helpers.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Store a snapshot and all of its entries; returns the snapshot id.
    pub fn insert_snapshot(&self, record: &SnapshotRecord, index: &SearchIndex) -> DbResult<i64> {
        let tx = self.conn.unchecked_transaction()?;
        let snapshot_id = store_snapshot(&tx, record, index)?;
        tx.commit()?;
        Ok(snapshot_id)
    }

    /// Delete snapshot `old_id` and store its replacement in one transaction.
    ///
    /// If storing fails the old snapshot is left in place.
    pub fn replace_snapshot(
        &self,
        old_id: i64,
        record: &SnapshotRecord,
        index: &SearchIndex,
    ) -> DbResult<i64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM snapshots WHERE id = ?1", params![old_id])?;
        let snapshot_id = store_snapshot(&tx, record, index)?;
        tx.commit()?;
        Ok(snapshot_id)
    }

    /// Find a previously imported snapshot of `source` with the given content hash.
    pub fn find_snapshot(&self, source: &str, sha256: &str) -> DbResult<Option<StoredSnapshot>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SNAPSHOT_SELECT} WHERE s.source = ?1 AND s.sha256 = ?2"))?;
        let found = stmt.query_row(params![source, sha256], snapshot_from_row).optional()?;
        Ok(found)
    }

    /// List all snapshots (ordered by id).
    pub fn list_snapshots(&self) -> DbResult<Vec<StoredSnapshot>> {
        let mut stmt = self.conn.prepare(&format!("{SNAPSHOT_SELECT} ORDER BY s.id"))?;
        let rows = stmt.query_map([], snapshot_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Delete a snapshot and everything stored under it. Returns whether it existed.
    pub fn delete_snapshot(&self, id: i64) -> DbResult<bool> {
        let removed = self.conn.execute("DELETE FROM snapshots WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Rebuild the in-memory index for a stored snapshot.
    pub fn load_snapshot(&self, id: i64) -> DbResult<Option<SearchIndex>> {
        let origin = self
            .conn
            .query_row(
                "SELECT category, bucket FROM snapshots WHERE id = ?1",
                params![id],
                |row| Ok((row.get::<_, Option<String>>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;
        let Some((category, bucket)) = origin else {
            return Ok(None);
        };

        let mut stmt_symbols = self.conn.prepare(
            r#"
            SELECT id, key, name
            FROM symbols
            WHERE snapshot_id = ?1
            ORDER BY position
            "#,
        )?;
        let mut stmt_occ = self.conn.prepare(
            r#"
            SELECT href, opens_in_parent, scope, signature
            FROM occurrences
            WHERE symbol_id = ?1
            ORDER BY ordinal
            "#,
        )?;

        let symbols = stmt_symbols.query_map(params![id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?;

        let mut entries = Vec::new();
        for symbol in symbols {
            let (symbol_id, key, name) = symbol?;
            let occurrences = stmt_occ.query_map(params![symbol_id], |row| {
                let href: String = row.get(0)?;
                let parent: i64 = row.get(1)?;
                Ok(Occurrence {
                    anchor: Anchor::parse(&href),
                    opens_in_parent: parent != 0,
                    scope: row.get(2)?,
                    signature: row.get(3)?,
                })
            })?;
            let mut entry = SymbolEntry::new(key, name);
            for occ in occurrences {
                entry.occurrences.push(occ?);
            }
            entries.push(entry);
        }

        Ok(Some(
            SearchIndex::from_entries(entries)
                .with_origin(category.as_deref().map(IndexCategory::parse), bucket),
        ))
    }

    /// Search symbol keys across every stored snapshot.
    ///
    /// The query is normalised the same way the in-memory search does it.
    pub fn search_symbols(&self, query: &SearchQuery) -> DbResult<Vec<StoredMatch>> {
        let needle = query.normalized();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let (predicate, pattern) = match query.mode {
            SearchMode::Exact => ("sym.key = ?1", needle),
            SearchMode::Prefix => {
                ("sym.key LIKE ?1 ESCAPE '\\'", format!("{}%", escape_like(&needle)))
            }
            SearchMode::Substring => {
                ("sym.key LIKE ?1 ESCAPE '\\'", format!("%{}%", escape_like(&needle)))
            }
        };
        let limit: i64 = query.limit.map(|l| l as i64).unwrap_or(-1);

        let sql = format!(
            r#"
            SELECT sym.snapshot_id, s.source, s.category, sym.key, sym.name,
                   (SELECT COUNT(*) FROM occurrences o WHERE o.symbol_id = sym.id)
            FROM symbols sym
            JOIN snapshots s ON s.id = sym.snapshot_id
            WHERE {predicate}
            ORDER BY sym.snapshot_id, sym.position
            LIMIT ?2
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![pattern, limit], |row| {
            Ok(StoredMatch {
                snapshot_id: row.get(0)?,
                source: row.get(1)?,
                category: row.get(2)?,
                key: row.get(3)?,
                name: row.get(4)?,
                occurrences: row.get::<_, i64>(5)? as usize,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Total number of stored symbols across all snapshots.
    pub fn symbol_count(&self) -> DbResult<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM symbols", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Insert a snapshot row plus its symbols and occurrences on `conn`.
///
/// Callers own the surrounding transaction.
fn store_snapshot(
    conn: &Connection,
    record: &SnapshotRecord,
    index: &SearchIndex,
) -> DbResult<i64> {
    conn.execute(
        r#"
        INSERT INTO snapshots (source, category, bucket, sha256, imported_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![record.source, record.category, record.bucket, record.sha256, record.imported_at],
    )?;
    let snapshot_id = conn.last_insert_rowid();

    let mut stmt_symbol = conn.prepare(
        r#"
        INSERT INTO symbols (snapshot_id, position, key, name)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )?;
    let mut stmt_occ = conn.prepare(
        r#"
        INSERT INTO occurrences (symbol_id, ordinal, href, opens_in_parent, scope, signature)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )?;
    for (pos, entry) in index.entries().iter().enumerate() {
        stmt_symbol.execute(params![snapshot_id, pos as i64, entry.key, entry.name])?;
        let symbol_id = conn.last_insert_rowid();
        for (ordinal, occ) in entry.occurrences.iter().enumerate() {
            stmt_occ.execute(params![
                symbol_id,
                ordinal as i64,
                occ.anchor.to_href(),
                if occ.opens_in_parent { 1 } else { 0 },
                occ.scope,
                occ.signature
            ])?;
        }
    }
    Ok(snapshot_id)
}

const SNAPSHOT_SELECT: &str = r#"
    SELECT s.id, s.source, s.category, s.bucket, s.sha256, s.imported_at,
           (SELECT COUNT(*) FROM symbols sym WHERE sym.snapshot_id = s.id),
           (SELECT COUNT(*) FROM occurrences o
              JOIN symbols sym ON sym.id = o.symbol_id
             WHERE sym.snapshot_id = s.id)
    FROM snapshots s
"#;

fn snapshot_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredSnapshot> {
    Ok(StoredSnapshot {
        id: row.get(0)?,
        record: SnapshotRecord {
            source: row.get(1)?,
            category: row.get(2)?,
            bucket: row.get(3)?,
            sha256: row.get(4)?,
            imported_at: row.get(5)?,
        },
        entry_count: row.get::<_, i64>(6)? as usize,
        occurrence_count: row.get::<_, i64>(7)? as usize,
    })
}

/// Escape `LIKE` wildcards; keys are full of `_`.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Apply schema migrations.
///
/// We use `PRAGMA user_version` as the schema version indicator.
fn apply_migrations(conn: &Connection) -> DbResult<()> {
    let mut current_version = current_schema_version(conn)?;

    // Reject DBs created with a newer schema than we support.
    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        // Initial schema.
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS snapshots (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                source      TEXT NOT NULL,
                category    TEXT,
                bucket      TEXT,
                sha256      TEXT NOT NULL,
                imported_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS symbols (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                snapshot_id INTEGER NOT NULL REFERENCES snapshots(id) ON DELETE CASCADE,
                position    INTEGER NOT NULL,
                key         TEXT NOT NULL,
                name        TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS occurrences (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol_id       INTEGER NOT NULL REFERENCES symbols(id) ON DELETE CASCADE,
                ordinal         INTEGER NOT NULL,
                href            TEXT NOT NULL,
                opens_in_parent INTEGER NOT NULL,
                scope           TEXT NOT NULL,
                signature       TEXT
            );

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
        current_version = 1;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE INDEX IF NOT EXISTS idx_symbols_key ON symbols(key);
            CREATE INDEX IF NOT EXISTS idx_symbols_snapshot ON symbols(snapshot_id, position);
            CREATE INDEX IF NOT EXISTS idx_occurrences_symbol ON occurrences(symbol_id, ordinal);
            CREATE INDEX IF NOT EXISTS idx_snapshots_sha256 ON snapshots(sha256);
            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

fn current_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
