//! # Serialization
//!
//! The inverse of [`parse_notebook`](crate::parsing::parse_notebook): cells
//! plus the format flags of the original parse become marker-delimited text
//! again. For any document the parser produces, reparsing the output gives
//! back the same number of cells with the same kinds and languages.
//!
//! Serialization is total; every cell sequence has a text form.

use crate::markers::{CellMagic, CommandDelimiter, Header, LineMagic, MagicLine, PercentDelimiter};
use crate::parsing::lines::is_blank;
use crate::parsing::types::{Cell, Language, NotebookFormat, ParsedDocument};

/// The flags threaded from a parse to the matching save.
///
/// The default (Databricks with header) is what callers fall back to when the
/// original flags were lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    pub format: NotebookFormat,
    pub has_header: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            format: NotebookFormat::Databricks,
            has_header: true,
        }
    }
}

impl From<&ParsedDocument> for SerializeOptions {
    fn from(doc: &ParsedDocument) -> Self {
        Self {
            format: doc.format,
            has_header: doc.has_header,
        }
    }
}

pub fn serialize(cells: &[Cell], format: NotebookFormat, has_header: bool) -> String {
    match format {
        NotebookFormat::Databricks => serialize_databricks(cells, has_header),
        NotebookFormat::Percent => serialize_percent(cells),
        NotebookFormat::Plain => serialize_plain(cells),
    }
}

pub fn serialize_with(cells: &[Cell], options: SerializeOptions) -> String {
    serialize(cells, options.format, options.has_header)
}

pub fn serialize_document(doc: &ParsedDocument) -> String {
    serialize_with(&doc.cells, SerializeOptions::from(doc))
}

fn serialize_databricks(cells: &[Cell], has_header: bool) -> String {
    let mut out: Vec<String> = Vec::new();
    if has_header {
        out.push(Header::LITERAL.to_string());
    }

    if cells.is_empty() {
        // A lone delimiter keeps a headerless empty notebook in this dialect.
        if !has_header {
            out.push(CommandDelimiter::CANONICAL.to_string());
        }
        return finish(out.join("\n"));
    }

    for cell in cells {
        out.push(String::new());
        out.push(CommandDelimiter::CANONICAL.to_string());
        out.push(String::new());
        push_databricks_body(&mut out, cell);
    }

    finish(out.join("\n"))
}

fn push_databricks_body(out: &mut Vec<String>, cell: &Cell) {
    if cell.is_markup() {
        push_decorated(out, Some(LineMagic::Markdown), &cell.source);
        return;
    }

    match cell.language {
        Language::Sql => push_decorated(out, Some(LineMagic::Sql), &cell.source),
        // %pip is shell syntax the parser keeps verbatim; it needs no %sh wrapper.
        Language::Shellscript if starts_with_magic(&cell.source, LineMagic::Pip) => {
            push_decorated(out, None, &cell.source)
        }
        Language::Shellscript => push_decorated(out, Some(LineMagic::Shell), &cell.source),
        // Content the parser would claim for another language keeps `%%python`.
        _ if opens_with_magic(&cell.source) => {
            out.push(CellMagic::Python.keyword().to_string());
            out.push(cell.source.clone());
        }
        // Decorated lines are never blank, so edge blanks and empty cells survive.
        _ if first_content_line(&cell.source).is_some_and(LineMagic::is_any)
            || has_blank_edge(&cell.source) =>
        {
            push_decorated(out, None, &cell.source)
        }
        _ => out.push(cell.source.clone()),
    }
}

fn push_decorated(out: &mut Vec<String>, magic: Option<LineMagic>, source: &str) {
    if let Some(magic) = magic {
        out.push(MagicLine::decorate(magic.keyword()));
    }
    out.extend(source.split('\n').map(MagicLine::decorate));
}

fn serialize_percent(cells: &[Cell]) -> String {
    if cells.is_empty() {
        return String::new();
    }
    let blocks: Vec<String> = cells
        .iter()
        .map(|cell| {
            let marker = PercentDelimiter::render(cell.is_markup(), cell.title.as_deref());
            format!("{marker}\n{}\n", percent_body(cell))
        })
        .collect();
    finish(blocks.join("\n"))
}

fn percent_body(cell: &Cell) -> String {
    if cell.is_markup() {
        return cell.source.clone();
    }
    with_cell_magic(cell)
}

/// Prefixes code with the `%%` line that selects its language.
///
/// The parser removes that line, so it must come back for the language to
/// survive a reparse or to reach a kernel. SQL and shell content that already
/// opens with a magic of its own is left alone. Python gets `%%python` only
/// when its first line is blank or is a magic the parser would act on.
pub(crate) fn with_cell_magic(cell: &Cell) -> String {
    let magic = match CellMagic::for_language(cell.language) {
        Some(magic) if !opens_with_magic(&cell.source) => Some(magic),
        Some(_) => None,
        None if cell.language == Language::Python
            && (opens_with_magic(&cell.source) || starts_blank(&cell.source)) =>
        {
            Some(CellMagic::Python)
        }
        None => None,
    };
    match magic {
        Some(magic) if cell.source.is_empty() => magic.keyword().to_string(),
        Some(magic) => format!("{}\n{}", magic.keyword(), cell.source),
        None => cell.source.clone(),
    }
}

fn serialize_plain(cells: &[Cell]) -> String {
    cells
        .iter()
        .map(|cell| cell.source.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn first_content_line(source: &str) -> Option<&str> {
    source.lines().find(|line| !is_blank(line))
}

fn opens_with_magic(source: &str) -> bool {
    first_content_line(source)
        .is_some_and(|line| LineMagic::detect(line).is_some() || CellMagic::parse(line).is_some())
}

/// True for empty content too.
fn starts_blank(source: &str) -> bool {
    source.split('\n').next().is_none_or(is_blank)
}

fn has_blank_edge(source: &str) -> bool {
    starts_blank(source) || source.split('\n').next_back().is_none_or(is_blank)
}

fn starts_with_magic(source: &str, magic: LineMagic) -> bool {
    first_content_line(source)
        .and_then(LineMagic::detect)
        .is_some_and(|found| found.magic == magic)
}

/// Exactly one trailing newline.
fn finish(text: String) -> String {
    let mut text = text.trim_end_matches('\n').to_string();
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_notebook;
    use pretty_assertions::assert_eq;

    #[test]
    fn databricks_layout() {
        let cells = vec![Cell::markdown("# Title\n\nBody"), Cell::code("x = 1")];
        let text = serialize(&cells, NotebookFormat::Databricks, true);
        insta::assert_snapshot!(text, @r"
        # Databricks notebook source

        # COMMAND ----------

        # MAGIC %md
        # MAGIC # Title
        # MAGIC
        # MAGIC Body

        # COMMAND ----------

        x = 1
        ");
    }

    #[test]
    fn sql_and_shell_cells_are_decorated() {
        let cells = vec![
            Cell::new(Language::Sql, "SELECT 1"),
            Cell::new(Language::Shellscript, "ls -la"),
        ];
        let text = serialize(&cells, NotebookFormat::Databricks, true);
        assert!(text.contains("# MAGIC %sql\n# MAGIC SELECT 1\n"));
        assert!(text.ends_with("# MAGIC %sh\n# MAGIC ls -la\n"));
    }

    #[test]
    fn pip_cells_are_not_wrapped_in_sh() {
        let cells = vec![Cell::new(Language::Shellscript, "%pip install foo>=0.9.0")];
        let text = serialize(&cells, NotebookFormat::Databricks, true);
        assert!(text.ends_with("\n\n# MAGIC %pip install foo>=0.9.0\n"));
        assert!(!text.contains("%sh"));
    }

    #[test]
    fn python_line_magic_is_decorated() {
        let cells = vec![Cell::code("%run ./setup")];
        let text = serialize(&cells, NotebookFormat::Databricks, false);
        assert_eq!(text, "\n# COMMAND ----------\n\n# MAGIC %run ./setup\n");
    }

    #[test]
    fn python_modulo_is_not_a_magic() {
        let cells = vec![Cell::code("x = 5 % 2")];
        let text = serialize(&cells, NotebookFormat::Databricks, true);
        assert!(text.ends_with("\n\nx = 5 % 2\n"));
    }

    #[test]
    fn exactly_one_trailing_newline() {
        let cells = vec![Cell::code("x = 1\n\n\n")];
        let text = serialize(&cells, NotebookFormat::Percent, false);
        assert_eq!(text, "# %%\nx = 1\n");
    }

    #[test]
    fn empty_python_cell_is_a_bare_magic_line() {
        let cells = vec![Cell::code(""), Cell::code("x = 1")];
        let text = serialize(&cells, NotebookFormat::Databricks, true);
        insta::assert_snapshot!(text, @r"
        # Databricks notebook source

        # COMMAND ----------

        # MAGIC

        # COMMAND ----------

        x = 1
        ");
        let reparsed = parse_notebook(&text);
        assert_eq!(reparsed.cells.len(), 2);
        assert_eq!(reparsed.cells[0].language, Language::Python);
        assert_eq!(reparsed.cells[0].source, "");
    }

    #[test]
    fn python_edge_blank_lines_are_decorated() {
        let cells = vec![Cell::code("\nx = 1\n")];
        let text = serialize(&cells, NotebookFormat::Databricks, true);
        assert!(text.ends_with("\n\n# MAGIC\n# MAGIC x = 1\n# MAGIC\n"));
        assert_eq!(parse_notebook(&text).cells[0].source, "\nx = 1\n");
    }

    #[test]
    fn python_opening_with_sql_magic_keeps_python() {
        let cells = vec![Cell::code("%sql\nSELECT 1")];
        let text = serialize(&cells, NotebookFormat::Databricks, true);
        assert!(text.ends_with("\n\n%%python\n%sql\nSELECT 1\n"));
        let cell = &parse_notebook(&text).cells[0];
        assert_eq!(cell.language, Language::Python);
        assert_eq!(cell.source, "%sql\nSELECT 1");
    }

    #[test]
    fn percent_python_gets_cell_magic_when_empty_or_leading_blank() {
        let cells = vec![Cell::code(""), Cell::code("\nx = 1")];
        let text = serialize(&cells, NotebookFormat::Percent, false);
        assert_eq!(text, "# %%\n%%python\n\n# %%\n%%python\n\nx = 1\n");
        let sources: Vec<_> = parse_notebook(&text)
            .cells
            .into_iter()
            .map(|c| (c.language, c.source))
            .collect();
        assert_eq!(
            sources,
            vec![
                (Language::Python, String::new()),
                (Language::Python, "\nx = 1".to_string()),
            ]
        );
    }

    #[test]
    fn header_only_document() {
        assert_eq!(
            serialize(&[], NotebookFormat::Databricks, true),
            "# Databricks notebook source\n"
        );
        let reparsed = parse_notebook(&serialize(&[], NotebookFormat::Databricks, false));
        assert_eq!(reparsed.format, NotebookFormat::Databricks);
        assert!(reparsed.cells.is_empty());
    }

    #[test]
    fn percent_layout() {
        let cells = vec![
            Cell::code("import os").with_title(Some("Setup".to_string())),
            Cell::markdown("# Notes"),
            Cell::new(Language::Sql, "SELECT 1"),
        ];
        let text = serialize(&cells, NotebookFormat::Percent, false);
        insta::assert_snapshot!(text, @r"
        # %% Setup
        import os

        # %% [markdown]
        # Notes

        # %%
        %%sql
        SELECT 1
        ");
    }

    #[test]
    fn percent_keeps_existing_line_magic() {
        let cells = vec![Cell::new(Language::Shellscript, "%pip install foo")];
        assert_eq!(
            serialize(&cells, NotebookFormat::Percent, false),
            "# %%\n%pip install foo\n"
        );
    }

    #[test]
    fn plain_is_verbatim() {
        let cells = vec![Cell::code("print('hi')\n")];
        assert_eq!(serialize(&cells, NotebookFormat::Plain, false), "print('hi')\n");
        assert_eq!(serialize(&[], NotebookFormat::Plain, false), "");
    }

    #[test]
    fn default_options_are_databricks_with_header() {
        let options = SerializeOptions::default();
        assert_eq!(options.format, NotebookFormat::Databricks);
        assert!(options.has_header);
        assert!(serialize_with(&[Cell::code("x")], options).starts_with(Header::LITERAL));
    }
}
