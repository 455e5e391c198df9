use crate::models::NotebookIndex;
use crate::parsing::{ParsedDocument, parse_notebook};
use crate::serialize::serialize_document;
use anyhow::Context;
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid notebooks directory: {0}")]
    InvalidNotebooksDir(String),
}

/// Read a notebook source file and return its text
pub fn read_notebook(
    relative_path: &RelativePath,
    notebooks_root: &Path,
) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(notebooks_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write notebook source text, creating parent directories
pub fn write_notebook(
    relative_path: &RelativePath,
    notebooks_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(notebooks_root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

pub fn load_document(
    relative_path: &RelativePath,
    notebooks_root: &Path,
) -> Result<ParsedDocument, IoError> {
    let text = read_notebook(relative_path, notebooks_root)?;
    Ok(parse_notebook(&text))
}

/// Serialize with the document's own format flags and write it back
pub fn save_document(
    relative_path: &RelativePath,
    notebooks_root: &Path,
    doc: &ParsedDocument,
) -> anyhow::Result<()> {
    write_notebook(relative_path, notebooks_root, &serialize_document(doc))
        .with_context(|| format!("Failed to save notebook {relative_path}"))
}

/// Scan for notebook sources whose extension is in `extensions`
pub fn scan_notebook_files(
    notebooks_root: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, IoError> {
    if !notebooks_root.exists() {
        return Err(IoError::InvalidNotebooksDir(
            "notebooks directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(notebooks_root, extensions, &mut files)?;
    files.sort();
    Ok(files)
}

/// Scan the folder, then read and detect each notebook for the index
pub fn build_index(notebooks_root: &Path, extensions: &[String]) -> Result<NotebookIndex, IoError> {
    validate_notebooks_dir(notebooks_root)?;

    let files = scan_notebook_files(notebooks_root, extensions)?;
    let mut index = NotebookIndex::new();
    for path in files {
        let text = fs::read_to_string(&path).map_err(IoError::Io)?;
        let relative = path
            .strip_prefix(notebooks_root)
            .map(Path::to_path_buf)
            .unwrap_or(path);
        index.add_notebook(relative, &text);
    }
    log::debug!("indexed {} notebooks", index.len());
    Ok(index)
}

fn scan_directory_recursive(
    dir: &Path,
    extensions: &[String],
    files: &mut Vec<PathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, extensions, files)?;
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str())
            && extensions.iter().any(|wanted| wanted == ext)
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_notebooks_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidNotebooksDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}
