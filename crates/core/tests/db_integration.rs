use doxsearch_core::db::{IndexDb, SnapshotRecord, CURRENT_SCHEMA_VERSION};
use doxsearch_core::model::{IndexCategory, Occurrence, SearchIndex, SymbolEntry};
use doxsearch_core::search::{SearchMode, SearchQuery};
use tempfile::tempdir;

fn sample_index() -> SearchIndex {
    SearchIndex::from_entries(vec![
        SymbolEntry::new("io_5fnew", "io_new")
            .with_occurrence(Occurrence::from_label(
                "../io-mainloop_8c.html#a02de531d9a661d8124ecc7eaa550d138",
                1,
                "io_new(int fd):&#160;io-mainloop.c",
            ))
            .with_occurrence(Occurrence::from_label(
                "../io_8h.html#a02de531d9a661d8124ecc7eaa550d138",
                1,
                "io_new(int fd):&#160;io-mainloop.c",
            )),
        SymbolEntry::new("io_5fref", "io_ref").with_occurrence(Occurrence::from_label(
            "../io-mainloop_8c.html#aa2ee13e29cfc54ecb6f1c14179f24695",
            1,
            "io-mainloop.c",
        )),
        SymbolEntry::new("iox5f", "iox5f").with_occurrence(Occurrence::from_label(
            "../x_8c.html#a1",
            0,
            "x.c",
        )),
    ])
    .with_origin(Some(IndexCategory::Functions), Some("9".into()))
}

#[test]
fn index_db_initializes_schema_and_round_trips_snapshots() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("index.db");

    let index = sample_index();
    let id;
    {
        let db = IndexDb::open(&db_path).expect("open db");
        let version: i32 = db
            .connection()
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .expect("schema version");
        assert_eq!(version, CURRENT_SCHEMA_VERSION);

        let record = SnapshotRecord::new("search/functions_9.js", "abc123")
            .with_origin(Some("functions".into()), Some("9".into()));
        id = db.insert_snapshot(&record, &index).expect("insert snapshot");
        assert!(id > 0);
    }

    // Second open should see existing schema and data.
    let db = IndexDb::open(&db_path).expect("re-open db");
    let snapshots = db.list_snapshots().expect("list snapshots");
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].id, id);
    assert_eq!(snapshots[0].record.source, "search/functions_9.js");
    assert_eq!(snapshots[0].record.category.as_deref(), Some("functions"));
    assert_eq!(snapshots[0].entry_count, 3);
    assert_eq!(snapshots[0].occurrence_count, 4);

    let loaded = db.load_snapshot(id).expect("load").expect("snapshot exists");
    assert_eq!(loaded.entries(), index.entries());
    assert_eq!(loaded.category, Some(IndexCategory::Functions));
    assert_eq!(loaded.bucket.as_deref(), Some("9"));

    assert!(db.load_snapshot(id + 100).expect("load missing").is_none());
}

#[test]
fn search_symbols_escapes_like_wildcards() {
    let dir = tempdir().expect("tempdir");
    let db = IndexDb::open(&dir.path().join("index.db")).expect("open db");
    db.insert_snapshot(&SnapshotRecord::new("a.js", "h1"), &sample_index()).expect("insert");

    // `io_` mangles to `io_5f`; the `_` must not match the `x` in `iox5f`.
    let hits = db.search_symbols(&SearchQuery::new("io_")).expect("search");
    let names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["io_new", "io_ref"]);
    assert_eq!(hits[0].occurrences, 2);
    assert_eq!(hits[0].source, "a.js");

    let exact = db
        .search_symbols(&SearchQuery::new("iox5f").with_mode(SearchMode::Exact))
        .expect("exact");
    assert_eq!(exact.len(), 1);

    let sub = db
        .search_symbols(
            &SearchQuery::new("new").with_mode(SearchMode::Substring).with_limit(Some(1)),
        )
        .expect("substring");
    assert_eq!(sub.len(), 1);
    assert_eq!(sub[0].name, "io_new");

    assert!(db.search_symbols(&SearchQuery::new("  ")).expect("empty").is_empty());
}

#[test]
fn find_and_delete_snapshot_cascades() {
    let dir = tempdir().expect("tempdir");
    let db = IndexDb::open(&dir.path().join("index.db")).expect("open db");
    let record = SnapshotRecord::new("a.js", "hash-a");
    let id = db.insert_snapshot(&record, &sample_index()).expect("insert");

    let found = db.find_snapshot("a.js", "hash-a").expect("find").expect("present");
    assert_eq!(found.id, id);
    assert!(db.find_snapshot("a.js", "hash-b").expect("find").is_none());
    // Same bytes under another file name are a different snapshot.
    assert!(db.find_snapshot("b.js", "hash-a").expect("find").is_none());
    assert_eq!(db.symbol_count().expect("count"), 3);

    assert!(db.delete_snapshot(id).expect("delete"));
    assert!(!db.delete_snapshot(id).expect("delete again"));
    assert_eq!(db.symbol_count().expect("count"), 0);
    let orphans: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM occurrences", [], |row| row.get(0))
        .expect("count occurrences");
    assert_eq!(orphans, 0);
}

#[test]
fn replace_snapshot_swaps_old_for_new() {
    let dir = tempdir().expect("tempdir");
    let db = IndexDb::open(&dir.path().join("index.db")).expect("open db");
    let record = SnapshotRecord::new("a.js", "hash-a");
    let old = db.insert_snapshot(&record, &sample_index()).expect("insert");

    let new = db.replace_snapshot(old, &record, &sample_index()).expect("replace");
    assert_ne!(new, old);
    let ids: Vec<i64> = db.list_snapshots().expect("list").iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![new]);
    assert_eq!(db.symbol_count().expect("count"), 3);
}

#[test]
fn failed_replace_keeps_the_old_snapshot() {
    let dir = tempdir().expect("tempdir");
    let db = IndexDb::open(&dir.path().join("index.db")).expect("open db");
    let record = SnapshotRecord::new("a.js", "hash-a");
    let old = db.insert_snapshot(&record, &sample_index()).expect("insert");

    db.connection()
        .execute_batch(
            "CREATE TRIGGER refuse_symbols BEFORE INSERT ON symbols \
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .expect("create trigger");

    let err = db.replace_snapshot(old, &record, &sample_index()).unwrap_err();
    assert!(err.to_string().contains("disk full"), "unexpected error: {err}");

    let snapshots = db.list_snapshots().expect("list");
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].id, old);
    assert_eq!(snapshots[0].entry_count, 3);
    assert_eq!(db.symbol_count().expect("count"), 3);
}
