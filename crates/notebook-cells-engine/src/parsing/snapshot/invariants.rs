use crate::parsing::lines::split_lines;
use crate::parsing::types::{NotebookFormat, ParsedDocument};

pub fn check(text: &str, doc: &ParsedDocument) {
    let n = split_lines(text).len();

    for cell in &doc.cells {
        assert!(
            cell.start_line <= cell.end_line && cell.end_line <= n,
            "cell lines out of bounds: {}..{} (line count: {})",
            cell.start_line,
            cell.end_line,
            n
        );
        assert_eq!(
            cell.kind,
            cell.language.kind(),
            "kind {:?} disagrees with language {:?}",
            cell.kind,
            cell.language
        );
    }

    for pair in doc.cells.windows(2) {
        assert!(
            pair[0].end_line <= pair[1].start_line,
            "cells overlap or are out of order: {}..{} then {}..{}",
            pair[0].start_line,
            pair[0].end_line,
            pair[1].start_line,
            pair[1].end_line
        );
    }

    if doc.format == NotebookFormat::Plain {
        assert_eq!(doc.cells.len(), 1, "plain documents hold exactly one cell");
        assert_eq!(doc.cells[0].source, text, "plain cell must copy the input");
    }

    if doc.has_header {
        assert_eq!(
            doc.format,
            NotebookFormat::Databricks,
            "only databricks sources carry a header"
        );
    }
}
