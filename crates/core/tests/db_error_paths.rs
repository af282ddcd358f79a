use doxsearch_core::db::{DbError, IndexDb, WorkspaceLayout};
use rusqlite::Connection;
use tempfile::tempdir;

#[test]
fn index_db_open_errors_on_unsupported_schema_version() {
    // Arrange: temp workspace layout + DB with an unsupported user_version.
    let tmp = tempdir().expect("temp dir");
    let layout = WorkspaceLayout::new(tmp.path());
    std::fs::create_dir_all(&layout.meta_dir).expect("create .doxsearch dir");

    {
        let conn = Connection::open(&layout.db_path).expect("open raw sqlite db");
        conn.pragma_update(None, "user_version", 99_i32).expect("set user_version pragma");
    }

    match IndexDb::open(&layout.db_path) {
        Err(DbError::UnsupportedSchemaVersion { found, min_supported, max_supported }) => {
            assert_eq!(found, 99, "unexpected found schema version");
            assert_eq!(min_supported, 0, "unexpected min_supported schema version");
            assert_eq!(max_supported, 2, "unexpected max_supported schema version");
        }
        Err(err) => {
            panic!("expected UnsupportedSchemaVersion error, got different DbError: {err}");
        }
        Ok(_) => {
            panic!("expected UnsupportedSchemaVersion error, got Ok(_)");
        }
    }
}

#[test]
fn open_workspace_db_reports_missing_config() {
    let tmp = tempdir().expect("temp dir");
    let layout = WorkspaceLayout::new(tmp.path());
    let err = doxsearch_core::db::open_workspace_db(&layout).unwrap_err();
    assert!(err.to_string().contains("Failed to read workspace config"), "unexpected error: {err}");
}
