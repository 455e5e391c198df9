use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary notebooks directory for testing
pub fn create_test_notebooks_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a notebook source file, making parent folders as needed
pub fn create_test_file(notebooks_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = notebooks_dir.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}
