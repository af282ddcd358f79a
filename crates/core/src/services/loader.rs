use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::codec::{parse_search_data, ParseError};
use crate::model::{IndexCategory, SearchIndex};
use crate::validate::{validate, ValidationReport};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Index path not found: {}", .0.display())]
    MissingPath(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("No index files (<section>_<bucket>.js) found under {}", .0.display())]
    NoIndexFiles(PathBuf),
}

/// An index file read from disk, with its identity and origin.
#[derive(Debug, Clone)]
pub struct LoadedIndex {
    pub path: PathBuf,
    /// Hex SHA-256 of the raw file content.
    pub sha256: String,
    pub index: SearchIndex,
}

impl LoadedIndex {
    pub fn file_name(&self) -> String {
        self.path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string()
    }

    pub fn category(&self) -> Option<&IndexCategory> {
        self.index.category.as_ref()
    }

    pub fn bucket(&self) -> Option<&str> {
        self.index.bucket.as_deref()
    }

    /// Validate the loaded entries, tagging issues with this file's name.
    pub fn validate(&self) -> ValidationReport {
        validate(&self.index).with_source(&self.file_name())
    }
}

/// Compute the SHA-256 of a byte slice as a hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Read and parse a single index file.
///
/// Section and bucket are taken from the file name when it follows the
/// generator's `<section>_<bucket>.js` convention.
pub fn load_index_file(path: &Path) -> Result<LoadedIndex, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingPath(path.to_path_buf()));
    }
    let bytes =
        fs::read(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let text = String::from_utf8_lossy(&bytes);
    let entries = parse_search_data(&text)
        .map_err(|source| LoadError::Parse { path: path.to_path_buf(), source })?;

    let origin = path.file_name().and_then(|n| n.to_str()).and_then(IndexCategory::from_file_name);
    let (category, bucket) = match origin {
        Some((category, bucket)) => (Some(category), Some(bucket)),
        None => (None, None),
    };

    tracing::debug!(path = %path.display(), entries = entries.len(), "parsed index file");
    Ok(LoadedIndex {
        path: path.to_path_buf(),
        sha256: sha256_hex(&bytes),
        index: SearchIndex::from_entries(entries).with_origin(category, bucket),
    })
}

/// Load a single file, or every `<section>_<bucket>.js` file in a directory
/// (sorted by file name). Other scripts such as `search.js` are skipped.
pub fn load_index_path(path: &Path) -> Result<Vec<LoadedIndex>, LoadError> {
    if path.is_file() {
        return Ok(vec![load_index_file(path)?]);
    }
    if !path.is_dir() {
        return Err(LoadError::MissingPath(path.to_path_buf()));
    }

    let read_dir =
        fs::read_dir(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }
        let is_index = entry_path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(IndexCategory::from_file_name)
            .is_some();
        if is_index {
            files.push(entry_path);
        } else {
            tracing::trace!(path = %entry_path.display(), "skipping non-index file");
        }
    }

    if files.is_empty() {
        return Err(LoadError::NoIndexFiles(path.to_path_buf()));
    }
    files.sort();

    files.iter().map(|file| load_index_file(file)).collect()
}
