use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use doxsearch_core::codec::write_search_data;
use doxsearch_core::db::WorkspaceLayout;
use doxsearch_core::model::SearchIndex;
use serde::Serialize;

use crate::canonicalize_or_current;
use crate::commands::IndexSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    /// The generator's own `var searchData=[...]` layout.
    Js,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
            ExportFormat::Js => "js",
        }
    }
}

pub fn parse_export_format(format: &str) -> Result<ExportFormat> {
    match format {
        "json" => Ok(ExportFormat::Json),
        "yaml" => Ok(ExportFormat::Yaml),
        "js" => Ok(ExportFormat::Js),
        other => Err(anyhow!("Invalid export format '{}'. Allowed: json, yaml, js", other)),
    }
}

#[derive(Debug, Serialize)]
struct ExportedIndex<'a> {
    source: &'a str,
    #[serde(flatten)]
    index: &'a SearchIndex,
}

/// Render loaded indexes in the requested format.
pub fn render_export(loaded: &[(String, SearchIndex)], format: ExportFormat) -> Result<String> {
    let exported: Vec<ExportedIndex<'_>> = loaded
        .iter()
        .map(|(source, index)| ExportedIndex { source, index })
        .collect();

    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&exported)?),
        ExportFormat::Yaml => Ok(serde_yaml::to_string(&exported)?),
        ExportFormat::Js => match loaded {
            [(_, index)] => Ok(write_search_data(index)),
            _ => bail!("js export needs exactly one index, found {}", loaded.len()),
        },
    }
}

/// Where an export goes: `--output` if given, `reports/snapshots.<ext>` for a
/// workspace, stdout for an index path.
pub fn export_target(
    source: &IndexSource,
    format: ExportFormat,
    output: Option<String>,
) -> Result<Option<PathBuf>> {
    match (output, source) {
        (Some(path), _) => Ok(Some(PathBuf::from(path))),
        (None, IndexSource::Workspace(root)) => {
            let layout = WorkspaceLayout::new(canonicalize_or_current(root)?);
            fs::create_dir_all(&layout.reports_dir).with_context(|| {
                format!("Failed to create reports dir: {}", layout.reports_dir.display())
            })?;
            Ok(Some(layout.reports_dir.join(format!("snapshots.{}", format.extension()))))
        }
        (None, IndexSource::Path(_)) => Ok(None),
    }
}

/// Export indexes in JSON, YAML or the generator's script form.
pub fn export_command(source: &IndexSource, format: &str, output: Option<String>) -> Result<()> {
    let format = parse_export_format(format)?;
    let loaded = source.load()?;
    let rendered = render_export(&loaded, format)?;

    match export_target(source, format, output)? {
        Some(path) => {
            fs::write(&path, &rendered)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            tracing::info!(path = %path.display(), indexes = loaded.len(), "wrote export");
            println!("Exported {} index(es) to {}", loaded.len(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
