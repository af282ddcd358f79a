use std::path::{Path, PathBuf};

/// Logical layout of a workspace on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
/// The CLI or other frontends are responsible for actually creating directories
/// and files based on this layout.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    /// Root directory of the workspace.
    pub root: PathBuf,
    /// Directory for internal metadata (.doxsearch).
    pub meta_dir: PathBuf,
    /// Path to the workspace config file (JSON).
    pub config_path: PathBuf,
    /// Path to the workspace database file.
    pub db_path: PathBuf,
    /// Directory for validation reports and exports (reports).
    pub reports_dir: PathBuf,
}

impl WorkspaceLayout {
    /// Compute the default layout for a workspace rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".doxsearch");
        let config_path = meta_dir.join("workspace.json");
        let db_path = meta_dir.join("index.db");
        let reports_dir = root.join("reports");

        Self { root, meta_dir, config_path, db_path, reports_dir }
    }

    /// Compute a database path string suitable for storing in `WorkspaceConfig`,
    /// typically as a path relative to `root`.
    pub fn db_path_relative_string(&self) -> String {
        match self.db_path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => self.db_path.to_string_lossy().to_string(),
        }
    }

    /// Resolve a path from the config (relative or absolute) against the root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths_hang_off_root() {
        let layout = WorkspaceLayout::new("/tmp/ws");
        assert_eq!(layout.meta_dir, PathBuf::from("/tmp/ws/.doxsearch"));
        assert_eq!(layout.config_path, PathBuf::from("/tmp/ws/.doxsearch/workspace.json"));
        assert_eq!(
            layout.db_path_relative_string(),
            Path::new(".doxsearch").join("index.db").to_string_lossy()
        );
        assert_eq!(layout.resolve("html/search"), PathBuf::from("/tmp/ws/html/search"));
    }
}
