//! Symbol lookup with the same semantics as the generator's browser search.
//!
//! The browser script trims the query, lowercases it, mangles it with the
//! key algorithm and then keeps every entry whose key starts with the result.
//! `SearchMode::Prefix` reproduces that exactly; `Exact` and `Substring` are
//! convenience variants over the same normalised key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::mangle_key;
use crate::model::{IndexCategory, SearchIndex, SymbolEntry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    #[default]
    Prefix,
    Exact,
    Substring,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Prefix => "prefix",
            SearchMode::Exact => "exact",
            SearchMode::Substring => "substring",
        }
    }

    /// Whether a normalised key matches a normalised query.
    pub fn matches(self, key: &str, query: &str) -> bool {
        match self {
            SearchMode::Prefix => key.starts_with(query),
            SearchMode::Exact => key == query,
            SearchMode::Substring => key.contains(query),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(SearchMode::Prefix),
            "exact" => Ok(SearchMode::Exact),
            "substring" => Ok(SearchMode::Substring),
            other => {
                Err(format!("Invalid search mode '{other}'. Allowed: prefix, exact, substring"))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub mode: SearchMode,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), mode: SearchMode::Prefix, limit: None }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// The query as the browser compares it against keys.
    pub fn normalized(&self) -> String {
        normalize_query(&self.text)
    }
}

/// Trim surrounding spaces, then mangle (which also lowercases).
pub fn normalize_query(text: &str) -> String {
    mangle_key(text.trim_matches(' '))
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMatch {
    /// Which of the searched indexes the hit came from (always 0 for `search`).
    pub index: usize,
    /// Position of the entry in its index.
    pub position: usize,
    pub key: String,
    pub name: String,
    pub occurrences: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<IndexCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

impl SymbolMatch {
    fn from_entry(position: usize, entry: &SymbolEntry, index: &SearchIndex) -> Self {
        Self {
            index: 0,
            position,
            key: entry.key.clone(),
            name: entry.name.clone(),
            occurrences: entry.occurrences.len(),
            category: index.category.clone(),
            bucket: index.bucket.clone(),
        }
    }
}

/// Search a single index. Results keep table order; an empty query matches
/// nothing.
pub fn search(index: &SearchIndex, query: &SearchQuery) -> Vec<SymbolMatch> {
    let needle = query.normalized();
    if needle.is_empty() {
        return Vec::new();
    }

    let limit = query.limit.unwrap_or(usize::MAX);
    index
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, entry)| query.mode.matches(&entry.key, &needle))
        .take(limit)
        .map(|(pos, entry)| SymbolMatch::from_entry(pos, entry, index))
        .collect()
}

/// Search several indexes (e.g. every bucket file of a search directory).
///
/// The limit applies to the combined result.
pub fn search_many<'a, I>(indexes: I, query: &SearchQuery) -> Vec<SymbolMatch>
where
    I: IntoIterator<Item = &'a SearchIndex>,
{
    let mut out = Vec::new();
    let limit = query.limit.unwrap_or(usize::MAX);
    let unlimited = query.clone().with_limit(None);

    for (ordinal, index) in indexes.into_iter().enumerate() {
        if out.len() >= limit {
            break;
        }
        let remaining = limit - out.len();
        out.extend(
            search(index, &unlimited)
                .into_iter()
                .take(remaining)
                .map(|hit| SymbolMatch { index: ordinal, ..hit }),
        );
    }
    out
}

/// Resolve a symbol by display name first, then by normalised key.
pub fn lookup<'a>(index: &'a SearchIndex, name: &str) -> Option<&'a SymbolEntry> {
    index.find_by_name(name).or_else(|| index.get(&normalize_query(name)))
}
