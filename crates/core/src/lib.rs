//! doxsearch-core
//!
//! Core library for working with documentation search indexes produced by
//! Doxygen (`search/<section>_<bucket>.js`).
//!
//! This crate defines the data model for index entries, the codec that reads
//! and writes the generator's JavaScript table format, structural validation,
//! the client-side search semantics, and a SQLite workspace database for
//! imported index snapshots.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends (the `doxsearch` CLI, future viewers, etc.).

pub mod codec;
pub mod db;
pub mod model;
pub mod search;
pub mod services;
pub mod validate;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
