use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::markers::PercentLine;

/// Whether a cell holds executable code or rendered prose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    #[default]
    Code,
    Markup,
}

/// The closed set of cell languages.
///
/// `R` and `Scala` are reserved; the classifier never produces them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Sql,
    Markdown,
    Shellscript,
    R,
    Scala,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Sql => "sql",
            Language::Markdown => "markdown",
            Language::Shellscript => "shellscript",
            Language::R => "r",
            Language::Scala => "scala",
        }
    }

    /// Markdown is the only markup language; everything else is code.
    pub fn kind(self) -> CellKind {
        match self {
            Language::Markdown => CellKind::Markup,
            _ => CellKind::Code,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "sql" => Ok(Language::Sql),
            "markdown" | "md" => Ok(Language::Markdown),
            "shellscript" | "shell" | "sh" | "bash" => Ok(Language::Shellscript),
            "r" => Ok(Language::R),
            "scala" => Ok(Language::Scala),
            _ => Err(format!(
                "Unknown cell language '{s}'. Expected: python, sql, markdown, shellscript, r, scala"
            )),
        }
    }
}

/// The marker dialect a source file is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotebookFormat {
    /// Header line plus `# COMMAND ----------` delimiters.
    #[default]
    Databricks,
    /// `# %%` delimiters.
    Percent,
    /// No markers at all; the whole file is one cell.
    Plain,
}

impl fmt::Display for NotebookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotebookFormat::Databricks => "databricks",
            NotebookFormat::Percent => "percent",
            NotebookFormat::Plain => "plain",
        };
        f.write_str(s)
    }
}

/// A contiguous run of source lines belonging to one cell, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCellSpan<'a> {
    pub lines: Vec<&'a str>,
    /// Inclusive line index into the original text.
    pub start: usize,
    /// Exclusive line index into the original text.
    pub end: usize,
    /// The `# %%` line that opened this span, for percent sources.
    pub delimiter: Option<PercentLine>,
}

/// A classified notebook cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell text with dialect decoration removed.
    pub source: String,
    pub kind: CellKind,
    pub language: Language,
    /// Inclusive line index of the first content line in the original text.
    pub start_line: usize,
    /// Exclusive line index after the last content line.
    pub end_line: usize,
    /// Title text from a `# %% Title` delimiter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Cell {
    /// Builds a cell whose kind follows from its language.
    pub fn new(language: Language, source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind: language.kind(),
            language,
            start_line: 0,
            end_line: 0,
            title: None,
        }
    }

    pub fn code(source: impl Into<String>) -> Self {
        Self::new(Language::Python, source)
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(Language::Markdown, source)
    }

    pub fn with_lines(mut self, start_line: usize, end_line: usize) -> Self {
        self.start_line = start_line;
        self.end_line = end_line;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn is_markup(&self) -> bool {
        self.kind == CellKind::Markup || self.language == Language::Markdown
    }
}

/// The result of parsing one notebook source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Cells in notebook order.
    pub cells: Vec<Cell>,
    pub format: NotebookFormat,
    /// Whether the `# Databricks notebook source` header was present.
    pub has_header: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_language() {
        assert_eq!(Cell::markdown("# Title").kind, CellKind::Markup);
        assert_eq!(Cell::new(Language::Sql, "SELECT 1").kind, CellKind::Code);
        assert_eq!(Cell::code("x = 1").kind, CellKind::Code);
    }

    #[test]
    fn language_round_trips_through_strings() {
        for language in [
            Language::Python,
            Language::Sql,
            Language::Markdown,
            Language::Shellscript,
            Language::R,
            Language::Scala,
        ] {
            assert_eq!(language.as_str().parse::<Language>(), Ok(language));
        }
    }

    #[test]
    fn language_aliases() {
        assert_eq!("bash".parse::<Language>(), Ok(Language::Shellscript));
        assert_eq!("MD".parse::<Language>(), Ok(Language::Markdown));
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn language_serializes_lowercase() {
        let json = serde_json::to_string(&Language::Shellscript).unwrap();
        assert_eq!(json, "\"shellscript\"");
    }

    #[test]
    fn default_format_is_databricks() {
        assert_eq!(NotebookFormat::default(), NotebookFormat::Databricks);
    }
}
