use std::path::Path;

use anyhow::{bail, Context, Result};
use doxsearch_core::services::load_index_path;
use doxsearch_core::validate::ValidationReport;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CheckedFile {
    pub file: String,
    pub category: Option<String>,
    pub bucket: Option<String>,
    pub entries: usize,
    pub occurrences: usize,
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub files: Vec<CheckedFile>,
    pub report: ValidationReport,
    pub passed: bool,
}

/// Parse and validate an index file (or directory) and return the combined report.
pub fn check_index(path: &str) -> Result<(Vec<CheckedFile>, ValidationReport)> {
    let loaded = load_index_path(Path::new(path))
        .with_context(|| format!("Failed to load index from {path}"))?;

    let mut files = Vec::new();
    let mut report = ValidationReport::default();
    for file in &loaded {
        files.push(CheckedFile {
            file: file.file_name(),
            category: file.category().map(|c| c.as_str().to_string()),
            bucket: file.bucket().map(str::to_string),
            entries: file.index.len(),
            occurrences: file.index.occurrence_count(),
        });
        report.merge(file.validate());
    }
    Ok((files, report))
}

/// Validate an index and fail when it has errors (or warnings with `strict`).
pub fn check_command(path: &str, json: bool, strict: bool) -> Result<()> {
    let (files, report) = check_index(path)?;
    let passed = report.is_ok() && (!strict || report.is_clean());
    tracing::debug!(files = files.len(), passed, "validation finished");

    if json {
        let summary = report.to_string();
        let output = CheckOutput { files, report, passed };
        println!("{}", serde_json::to_string_pretty(&output)?);
        if !passed {
            bail!("Validation failed: {summary}");
        }
        return Ok(());
    }

    println!("Checked {} file(s):", files.len());
    for file in &files {
        let origin = match (&file.category, &file.bucket) {
            (Some(category), Some(bucket)) => format!(" [{category}/{bucket}]"),
            _ => String::new(),
        };
        println!(
            "  - {}{}: {} entries, {} occurrences",
            file.file, origin, file.entries, file.occurrences
        );
    }
    if report.issues.is_empty() {
        println!("Issues: (none)");
    } else {
        println!("Issues:");
        for issue in &report.issues {
            println!("  {}", issue);
        }
    }
    println!("Summary: {}", report);

    if !passed {
        bail!("Validation failed: {report}");
    }
    Ok(())
}
