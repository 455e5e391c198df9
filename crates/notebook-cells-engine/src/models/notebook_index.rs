use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::parsing::{Language, NotebookFormat, parse_notebook};

/// A discovered notebook and what a parse found in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookEntry {
    pub relative_path: PathBuf,
    pub display_name: String,
    pub format: NotebookFormat,
    pub cell_count: usize,
    /// Distinct cell languages in first-seen order.
    pub languages: Vec<Language>,
}

impl NotebookEntry {
    pub fn from_text(relative_path: PathBuf, text: &str) -> Self {
        let doc = parse_notebook(text);
        let mut languages = Vec::new();
        for cell in &doc.cells {
            if !languages.contains(&cell.language) {
                languages.push(cell.language);
            }
        }
        let display_name = relative_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());

        Self {
            relative_path,
            display_name,
            format: doc.format,
            cell_count: doc.cells.len(),
            languages,
        }
    }
}

/// In-memory index of notebooks, sorted by path.
#[derive(Debug, Default)]
pub struct NotebookIndex {
    notebooks: BTreeMap<PathBuf, NotebookEntry>,
}

impl NotebookIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and add or replace the entry for `relative_path`
    pub fn add_notebook(&mut self, relative_path: PathBuf, text: &str) {
        let entry = NotebookEntry::from_text(relative_path.clone(), text);
        self.notebooks.insert(relative_path, entry);
    }

    pub fn notebooks(&self) -> impl Iterator<Item = &NotebookEntry> {
        self.notebooks.values()
    }

    pub fn get(&self, relative_path: &Path) -> Option<&NotebookEntry> {
        self.notebooks.get(relative_path)
    }

    pub fn len(&self) -> usize {
        self.notebooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notebooks.is_empty()
    }
}
