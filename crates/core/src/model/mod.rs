//! Core data model for documentation search indexes.
//!
//! A generated index file is an ordered table of symbol entries. Each entry
//! has a mangled search key, a display name, and one or more occurrences
//! pointing at anchors in the generated HTML pages:
//!
//! ```text
//! ['io_5fnew',['io_new',['../io-mainloop_8c.html#a02de…',1,'io_new(int fd):&#160;io-mainloop.c'],
//!                       ['../io_8h.html#a02de…',1,'io_new(int fd):&#160;io-mainloop.c']]]
//! ```
//!
//! Loaded indexes are immutable snapshots; nothing in this crate mutates an
//! entry after it has been parsed.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{decode_entities, decode_page_name, encode_entities, NBSP};

/// Location of an occurrence inside the generated documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Number of leading `../` segments in the original href.
    #[serde(default)]
    pub depth: usize,
    /// Generated page (e.g. `io-mainloop_8c.html`).
    pub page: String,
    /// Fragment after `#` (e.g. `a02de531d9a661d8124ecc7eaa550d138`), if any.
    pub fragment: Option<String>,
}

impl Anchor {
    /// Parse an href as emitted by the generator.
    pub fn parse(href: &str) -> Self {
        let mut rest = href;
        let mut depth = 0;
        while let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
            depth += 1;
        }
        let (page, fragment) = match rest.split_once('#') {
            Some((page, fragment)) => (page, Some(fragment.to_string())),
            None => (rest, None),
        };
        Self { depth, page: page.to_string(), fragment }
    }

    /// Rebuild the href this anchor was parsed from.
    pub fn to_href(&self) -> String {
        let mut out = "../".repeat(self.depth);
        out.push_str(&self.page);
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }

    /// True when neither a page nor a fragment is present.
    pub fn is_empty(&self) -> bool {
        self.page.is_empty() && self.fragment.as_deref().map_or(true, str::is_empty)
    }

    /// Name of the file (or compound) documented by the target page.
    pub fn source_file(&self) -> String {
        decode_page_name(&self.page)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_href())
    }
}

/// One place a symbol is documented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub anchor: Anchor,
    /// Whether the browser opens the link in the parent frame.
    pub opens_in_parent: bool,
    /// Defining file or enclosing scope (`io-mainloop.c`).
    pub scope: String,
    /// Declaration signature when the generator emitted one
    /// (`io_new(int fd)`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Occurrence {
    /// Build an occurrence from the raw `[href, flag, label]` triple.
    ///
    /// The label is either `scope` or `signature:&#160;scope`.
    pub fn from_label(href: &str, flag: i64, raw_label: &str) -> Self {
        let label = decode_entities(raw_label);
        let separator = format!(":{NBSP}");
        let (signature, scope) = match label.split_once(&separator) {
            Some((signature, scope)) => (Some(signature.to_string()), scope.to_string()),
            None => (None, label),
        };
        Self { anchor: Anchor::parse(href), opens_in_parent: flag != 0, scope, signature }
    }

    /// Label in the generator's encoded form.
    pub fn label(&self) -> String {
        match &self.signature {
            Some(signature) => encode_entities(&format!("{signature}:{NBSP}{}", self.scope)),
            None => encode_entities(&self.scope),
        }
    }

    /// Name of the file the anchor points into (`io_8h.html` -> `io.h`).
    pub fn documented_in(&self) -> String {
        self.anchor.source_file()
    }
}

/// A single row of the search table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Mangled, lowercased search key (`io_5fnew`).
    pub key: String,
    /// Human-readable symbol name (`io_new`).
    pub name: String,
    pub occurrences: Vec<Occurrence>,
}

impl SymbolEntry {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self { key: key.into(), name: name.into(), occurrences: Vec::new() }
    }

    /// Builder-style helper used by tests and the parser.
    pub fn with_occurrence(mut self, occurrence: Occurrence) -> Self {
        self.occurrences.push(occurrence);
        self
    }

    /// Whether the symbol is documented in more than one place (e.g. a header
    /// declaration and a source definition).
    pub fn is_multi(&self) -> bool {
        self.occurrences.len() > 1
    }

    /// Distinct scopes of this symbol, in first-seen order.
    pub fn files(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for occ in &self.occurrences {
            if !out.contains(&occ.scope.as_str()) {
                out.push(&occ.scope);
            }
        }
        out
    }
}

/// Index section, taken from the generated file name (`functions_9.js`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexCategory {
    All,
    Classes,
    Namespaces,
    Files,
    Functions,
    Variables,
    Typedefs,
    Enums,
    EnumValues,
    Related,
    Defines,
    Groups,
    Pages,
    Other(String),
}

impl IndexCategory {
    pub fn parse(name: &str) -> Self {
        match name {
            "all" => IndexCategory::All,
            "classes" => IndexCategory::Classes,
            "namespaces" => IndexCategory::Namespaces,
            "files" => IndexCategory::Files,
            "functions" => IndexCategory::Functions,
            "variables" => IndexCategory::Variables,
            "typedefs" => IndexCategory::Typedefs,
            "enums" => IndexCategory::Enums,
            "enumvalues" => IndexCategory::EnumValues,
            "related" => IndexCategory::Related,
            "defines" => IndexCategory::Defines,
            "groups" => IndexCategory::Groups,
            "pages" => IndexCategory::Pages,
            other => IndexCategory::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IndexCategory::All => "all",
            IndexCategory::Classes => "classes",
            IndexCategory::Namespaces => "namespaces",
            IndexCategory::Files => "files",
            IndexCategory::Functions => "functions",
            IndexCategory::Variables => "variables",
            IndexCategory::Typedefs => "typedefs",
            IndexCategory::Enums => "enums",
            IndexCategory::EnumValues => "enumvalues",
            IndexCategory::Related => "related",
            IndexCategory::Defines => "defines",
            IndexCategory::Groups => "groups",
            IndexCategory::Pages => "pages",
            IndexCategory::Other(name) => name,
        }
    }

    /// Split a generated file name (`functions_9.js`) into its section and
    /// bucket label. Returns `None` for files that do not follow the
    /// `<section>_<bucket>.js` convention.
    pub fn from_file_name(file_name: &str) -> Option<(Self, String)> {
        let stem = file_name.strip_suffix(".js")?;
        let (section, bucket) = stem.rsplit_once('_')?;
        if section.is_empty()
            || bucket.is_empty()
            || !bucket.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return None;
        }
        Some((Self::parse(section), bucket.to_string()))
    }
}

impl fmt::Display for IndexCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, immutable index snapshot.
///
/// Duplicate keys are preserved (validation reports them); lookups return
/// the first entry with a given key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub category: Option<IndexCategory>,
    pub bucket: Option<String>,
    entries: Vec<SymbolEntry>,
    #[serde(skip)]
    by_key: HashMap<String, usize>,
}

impl SearchIndex {
    pub fn from_entries(entries: Vec<SymbolEntry>) -> Self {
        let mut by_key = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            by_key.entry(entry.key.clone()).or_insert(pos);
        }
        Self { category: None, bucket: None, entries, by_key }
    }

    /// Attach the section/bucket the entries were loaded from.
    pub fn with_origin(mut self, category: Option<IndexCategory>, bucket: Option<String>) -> Self {
        self.category = category;
        self.bucket = bucket;
        self
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by mangled key.
    pub fn get(&self, key: &str) -> Option<&SymbolEntry> {
        match self.by_key.get(key) {
            Some(pos) => self.entries.get(*pos),
            // Deserialized indexes have no key map; fall back to a scan.
            None if self.by_key.is_empty() => self.entries.iter().find(|e| e.key == key),
            None => None,
        }
    }

    /// Look up an entry by its display name.
    pub fn find_by_name(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Total number of occurrences across all entries.
    pub fn occurrence_count(&self) -> usize {
        self.entries.iter().map(|e| e.occurrences.len()).sum()
    }

    /// Group symbol names by defining scope.
    pub fn symbols_by_file(&self) -> BTreeMap<String, Vec<String>> {
        let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in &self.entries {
            for scope in entry.files() {
                let names = out.entry(scope.to_string()).or_default();
                if !names.contains(&entry.name) {
                    names.push(entry.name.clone());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_parses_relative_href() {
        let anchor = Anchor::parse("../io-mainloop_8c.html#a02de531d9a661d8124ecc7eaa550d138");
        assert_eq!(anchor.depth, 1);
        assert_eq!(anchor.page, "io-mainloop_8c.html");
        assert_eq!(anchor.fragment.as_deref(), Some("a02de531d9a661d8124ecc7eaa550d138"));
        assert_eq!(anchor.source_file(), "io-mainloop.c");
        assert_eq!(anchor.to_href(), "../io-mainloop_8c.html#a02de531d9a661d8124ecc7eaa550d138");
    }

    #[test]
    fn anchor_without_fragment() {
        let anchor = Anchor::parse("index.html");
        assert_eq!(anchor.depth, 0);
        assert_eq!(anchor.fragment, None);
        assert!(!anchor.is_empty());
        assert!(Anchor::parse("").is_empty());
    }

    #[test]
    fn occurrence_splits_signature_and_scope() {
        let occ = Occurrence::from_label(
            "../io_8h.html#a7be060f450a2fa0d260d3ae9a98c983c",
            1,
            "io_destroy(struct io *io):&#160;io-mainloop.c",
        );
        assert!(occ.opens_in_parent);
        assert_eq!(occ.signature.as_deref(), Some("io_destroy(struct io *io)"));
        assert_eq!(occ.scope, "io-mainloop.c");
        assert_eq!(occ.documented_in(), "io.h");
        assert_eq!(occ.label(), "io_destroy(struct io *io):&#160;io-mainloop.c");
    }

    #[test]
    fn occurrence_with_plain_scope() {
        let occ = Occurrence::from_label("../uuid_8c.html#a518e", 0, "uuid.c");
        assert!(!occ.opens_in_parent);
        assert_eq!(occ.signature, None);
        assert_eq!(occ.scope, "uuid.c");
        assert_eq!(occ.label(), "uuid.c");
    }

    #[test]
    fn category_from_file_name() {
        assert_eq!(
            IndexCategory::from_file_name("functions_9.js"),
            Some((IndexCategory::Functions, "9".to_string()))
        );
        assert_eq!(
            IndexCategory::from_file_name("enumvalues_1a.js"),
            Some((IndexCategory::EnumValues, "1a".to_string()))
        );
        assert_eq!(
            IndexCategory::from_file_name("custom_0.js"),
            Some((IndexCategory::Other("custom".into()), "0".to_string()))
        );
        assert_eq!(IndexCategory::from_file_name("search.js"), None);
        assert_eq!(IndexCategory::from_file_name("searchdata.js"), None);
        assert_eq!(IndexCategory::from_file_name("functions_9.html"), None);
    }

    #[test]
    fn index_lookup_keeps_first_duplicate() {
        let index = SearchIndex::from_entries(vec![
            SymbolEntry::new("io_5fref", "io_ref"),
            SymbolEntry::new("io_5fref", "io_ref_again"),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("io_5fref").map(|e| e.name.as_str()), Some("io_ref"));
        assert!(index.get("missing").is_none());
        assert_eq!(index.find_by_name("io_ref_again").map(|e| e.key.as_str()), Some("io_5fref"));
    }

    #[test]
    fn groups_symbols_by_scope() {
        let index = SearchIndex::from_entries(vec![
            SymbolEntry::new("is_5fuuid16", "is_uuid16")
                .with_occurrence(Occurrence::from_label("../uuid_8c.html#a1", 1, "uuid.c")),
            SymbolEntry::new("io_5fnew", "io_new")
                .with_occurrence(Occurrence::from_label(
                    "../io-mainloop_8c.html#a2",
                    1,
                    "io_new(int fd):&#160;io-mainloop.c",
                ))
                .with_occurrence(Occurrence::from_label(
                    "../io_8h.html#a2",
                    1,
                    "io_new(int fd):&#160;io-mainloop.c",
                )),
        ]);
        let grouped = index.symbols_by_file();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["uuid.c"], vec!["is_uuid16".to_string()]);
        assert_eq!(grouped["io-mainloop.c"], vec!["io_new".to_string()]);
        assert_eq!(index.occurrence_count(), 3);
    }
}
