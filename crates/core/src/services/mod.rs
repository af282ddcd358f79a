//! Services that tie the codec, validation and the workspace database together.

pub mod import;
pub mod loader;

pub use import::{import_path, ImportOutcome, ImportStatus, ImportSummary};
pub use loader::{load_index_file, load_index_path, sha256_hex, LoadError, LoadedIndex};
