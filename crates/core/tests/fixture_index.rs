use std::path::PathBuf;

use doxsearch_core::codec::{parse_search_data, write_search_data};
use doxsearch_core::model::IndexCategory;
use doxsearch_core::search::{lookup, search, SearchMode, SearchQuery};
use doxsearch_core::services::load_index_file;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/functions_9.js")
}

#[test]
fn loads_fixture_with_origin_and_hash() {
    let loaded = load_index_file(&fixture_path()).expect("load fixture");
    assert_eq!(loaded.category(), Some(&IndexCategory::Functions));
    assert_eq!(loaded.bucket(), Some("9"));
    assert_eq!(loaded.sha256.len(), 64);
    assert_eq!(loaded.index.len(), 20);
    assert_eq!(loaded.index.occurrence_count(), 29);
}

#[test]
fn fixture_satisfies_structural_properties() {
    let loaded = load_index_file(&fixture_path()).expect("load fixture");
    let report = loaded.validate();
    assert!(report.is_clean(), "unexpected issues: {:#?}", report.issues);
    assert_eq!(report.entries_checked, 20);

    for entry in loaded.index.entries() {
        assert!(!entry.key.is_empty());
        for occ in &entry.occurrences {
            assert!(occ.anchor.fragment.as_deref().is_some_and(|f| !f.is_empty()));
        }
    }
}

#[test]
fn header_and_source_occurrences_are_distinguished() {
    let loaded = load_index_file(&fixture_path()).expect("load fixture");
    let destroy = lookup(&loaded.index, "io_destroy").expect("io_destroy present");

    let documented: Vec<String> = destroy.occurrences.iter().map(|o| o.documented_in()).collect();
    assert_eq!(documented, vec!["io-mainloop.c".to_string(), "io.h".to_string()]);
    assert_eq!(destroy.files(), vec!["io-mainloop.c"]);
    assert_eq!(
        destroy.occurrences[0].signature.as_deref(),
        Some("io_destroy(struct io *io)")
    );

    let io_ref = lookup(&loaded.index, "io_ref").expect("io_ref present");
    assert_eq!(io_ref.occurrences.len(), 1);
    assert_eq!(io_ref.occurrences[0].signature, None);
}

#[test]
fn prefix_search_over_fixture() {
    let loaded = load_index_file(&fixture_path()).expect("load fixture");
    let index = &loaded.index;

    assert_eq!(search(index, &SearchQuery::new("io_")).len(), 13);
    assert_eq!(search(index, &SearchQuery::new("io_set")).len(), 4);
    assert_eq!(search(index, &SearchQuery::new("IS_UUID")).len(), 3);

    let handlers =
        search(index, &SearchQuery::new("handler").with_mode(SearchMode::Substring));
    let names: Vec<&str> = handlers.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["io_set_disconnect_handler", "io_set_read_handler", "io_set_write_handler"]
    );
    assert!(handlers.iter().all(|m| m.category == Some(IndexCategory::Functions)));
}

#[test]
fn groups_fixture_symbols_by_file() {
    let loaded = load_index_file(&fixture_path()).expect("load fixture");
    let by_file = loaded.index.symbols_by_file();

    let files: Vec<&str> = by_file.keys().map(String::as_str).collect();
    assert_eq!(files, vec!["att.c", "gatt-client.c", "io-mainloop.c", "uuid.c"]);
    assert_eq!(by_file["io-mainloop.c"].len(), 13);
    assert_eq!(by_file["uuid.c"].len(), 4);
}

#[test]
fn written_fixture_parses_to_same_entries() {
    let loaded = load_index_file(&fixture_path()).expect("load fixture");
    let rewritten = write_search_data(&loaded.index);
    let reparsed = parse_search_data(&rewritten).expect("rewritten output parses");
    assert_eq!(reparsed, loaded.index.entries());

    // The generator's own layout is reproduced byte-for-byte.
    let original = std::fs::read_to_string(fixture_path()).expect("read fixture");
    assert_eq!(rewritten.trim_end(), original.trim_end());
}
