use relative_path::{RelativePath, RelativePathBuf};

/// A notebook source addressed relative to the notebooks root
#[derive(Debug, Clone, PartialEq)]
pub struct NotebookFile {
    relative_path: RelativePathBuf,
    display_name: String,
    display_path: String,
}

impl NotebookFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = relative_path
            .file_stem()
            .filter(|stem| !stem.is_empty())
            .unwrap_or("Untitled")
            .to_string();
        let display_path = match relative_path.extension() {
            Some(ext) => relative_path
                .as_str()
                .strip_suffix(ext)
                .and_then(|p| p.strip_suffix('.'))
                .unwrap_or(relative_path.as_str())
                .to_string(),
            None => relative_path.as_str().to_string(),
        };

        Self {
            relative_path,
            display_name,
            display_path,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without its extension
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Relative path without the extension, for titles
    pub fn display_path(&self) -> &str {
        &self.display_path
    }
}

impl From<RelativePathBuf> for NotebookFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for NotebookFile {
    fn from(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }
}
