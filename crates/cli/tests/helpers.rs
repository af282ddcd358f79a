use std::fs;
use std::path::Path;

use doxsearch::{canonicalize_or_current, infer_workspace_name};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_resolves_existing_relative_path() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current("nested").expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn canonicalize_or_current_keeps_absolute_missing_path() {
    let tmp = tempdir().expect("tempdir");
    let missing = tmp.path().join("not-yet-created");
    let result = canonicalize_or_current(missing.to_str().expect("utf8 path")).expect("resolve");
    assert_eq!(result, missing);
}

#[test]
fn infer_workspace_name_uses_last_path_component() {
    assert_eq!(infer_workspace_name(Path::new("/srv/docs/bluez-shared")), "bluez-shared");
    assert_eq!(infer_workspace_name(Path::new("/tmp/workspace-root")), "workspace-root");
}

#[test]
fn infer_workspace_name_falls_back_for_root() {
    assert_eq!(infer_workspace_name(Path::new("/")), "unnamed-workspace");
}
