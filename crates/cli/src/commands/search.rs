use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use doxsearch_core::db::{open_workspace_db, WorkspaceLayout};
use doxsearch_core::model::{Occurrence, SearchIndex};
use doxsearch_core::search::{lookup, search_many, SearchMode, SearchQuery};
use serde::Serialize;

use crate::canonicalize_or_current;
use crate::commands::IndexSource;

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub source: String,
    pub category: Option<String>,
    pub key: String,
    pub name: String,
    pub occurrences: usize,
}

#[derive(Debug, Serialize)]
pub struct OccurrenceDetail {
    pub href: String,
    pub opens_in_parent: bool,
    pub scope: String,
    pub signature: Option<String>,
    pub documented_in: String,
}

impl From<&Occurrence> for OccurrenceDetail {
    fn from(occ: &Occurrence) -> Self {
        Self {
            href: occ.anchor.to_href(),
            opens_in_parent: occ.opens_in_parent,
            scope: occ.scope.clone(),
            signature: occ.signature.clone(),
            documented_in: occ.documented_in(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SymbolDetail {
    pub source: String,
    pub key: String,
    pub name: String,
    pub occurrences: Vec<OccurrenceDetail>,
}

#[derive(Debug, Serialize)]
pub struct FileSymbols {
    pub file: String,
    pub symbols: Vec<String>,
}

/// Find symbols whose key matches the (mangled) query.
pub fn search_command(
    source: &IndexSource,
    query: &str,
    mode: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mode: SearchMode = mode.parse().map_err(anyhow::Error::msg)?;
    let query = SearchQuery::new(query).with_mode(mode).with_limit(limit);

    let hits: Vec<SearchHit> = match source {
        IndexSource::Workspace(root) => {
            let root_path = canonicalize_or_current(root)?;
            let layout = WorkspaceLayout::new(&root_path);
            let (_config, _db_path, db) = open_workspace_db(&layout)?;
            db.search_symbols(&query)
                .context("Failed to search workspace database")?
                .into_iter()
                .map(|m| SearchHit {
                    source: m.source,
                    category: m.category,
                    key: m.key,
                    name: m.name,
                    occurrences: m.occurrences,
                })
                .collect()
        }
        IndexSource::Path(_) => {
            let loaded = source.load()?;
            search_many(loaded.iter().map(|(_, index)| index), &query)
                .into_iter()
                .map(|m| SearchHit {
                    source: loaded[m.index].0.clone(),
                    category: m.category.map(|c| c.as_str().to_string()),
                    key: m.key,
                    name: m.name,
                    occurrences: m.occurrences,
                })
                .collect()
        }
    };
    tracing::debug!(hits = hits.len(), mode = %mode, "search finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No matches for '{}'", query.text);
        return Ok(());
    }
    println!("Matches for '{}' ({}):", query.text, mode);
    for hit in &hits {
        let multi = if hit.occurrences > 1 {
            format!(" ({} occurrences)", hit.occurrences)
        } else {
            String::new()
        };
        println!("  - {}{} [{}]", hit.name, multi, hit.source);
    }
    Ok(())
}

fn find_symbol(loaded: &[(String, SearchIndex)], name: &str) -> Option<SymbolDetail> {
    loaded.iter().find_map(|(label, index)| {
        lookup(index, name).map(|entry| SymbolDetail {
            source: label.clone(),
            key: entry.key.clone(),
            name: entry.name.clone(),
            occurrences: entry.occurrences.iter().map(OccurrenceDetail::from).collect(),
        })
    })
}

/// Show every documented occurrence of one symbol.
pub fn show_command(source: &IndexSource, name: &str, json: bool) -> Result<()> {
    let loaded = source.load()?;
    let Some(detail) = find_symbol(&loaded, name) else {
        bail!("Symbol '{name}' not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("{} (key '{}', from {})", detail.name, detail.key, detail.source);
    for occ in &detail.occurrences {
        let target = if occ.opens_in_parent { " [parent frame]" } else { "" };
        println!("  - {}{}", occ.href, target);
        if let Some(sig) = &occ.signature {
            println!("      signature: {}", sig);
        }
        println!("      in: {}", occ.documented_in);
    }
    Ok(())
}

/// Group symbol names by defining scope across every loaded index.
pub fn files_command(source: &IndexSource, json: bool) -> Result<()> {
    let loaded = source.load()?;

    let mut by_file = BTreeMap::<String, Vec<String>>::new();
    for (_, index) in &loaded {
        for (file, symbols) in index.symbols_by_file() {
            let slot = by_file.entry(file).or_default();
            for symbol in symbols {
                if !slot.contains(&symbol) {
                    slot.push(symbol);
                }
            }
        }
    }
    let files: Vec<FileSymbols> =
        by_file.into_iter().map(|(file, symbols)| FileSymbols { file, symbols }).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if files.is_empty() {
        println!("Files: (none)");
        return Ok(());
    }
    for entry in &files {
        println!("{} ({} symbols)", entry.file, entry.symbols.len());
        for symbol in &entry.symbols {
            println!("  - {}", symbol);
        }
    }
    Ok(())
}
