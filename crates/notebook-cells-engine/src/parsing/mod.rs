//! # Notebook Parsing
//!
//! Text goes through three phases:
//!
//! 1. **Detection** (`detect`): decide the marker dialect and whether the
//!    Databricks header is present
//! 2. **Splitting** (`split`): cut the lines into `RawCellSpan`s, consuming
//!    delimiter and header lines
//! 3. **Classification** (`classify`): give each span a kind and language and
//!    strip its decoration
//!
//! Parsing is total: every input, including the empty string, produces a
//! `ParsedDocument`.

pub mod classify;
pub mod detect;
pub mod lines;
pub mod snapshot;
pub mod split;
pub mod types;

pub use classify::CellClassifier;
pub use detect::{detect, has_header};
pub use split::split;
pub use types::{Cell, CellKind, Language, NotebookFormat, ParsedDocument, RawCellSpan};

use lines::split_lines;

pub fn parse_notebook(text: &str) -> ParsedDocument {
    let format = detect(text);
    let has_header = has_header(text);
    let lines = split_lines(text);
    let spans = split(&lines, format, has_header);

    let cells: Vec<Cell> = match format {
        // The single plain cell keeps the input byte-for-byte, line endings included.
        NotebookFormat::Plain => spans
            .iter()
            .map(|span| Cell::code(text).with_lines(span.start, span.end))
            .collect(),
        _ => {
            let classifier = CellClassifier;
            spans
                .iter()
                .map(|span| classifier.classify(span, format))
                .collect()
        }
    };

    log::debug!(
        "parsed {} cells from {} lines ({format}, header: {has_header})",
        cells.len(),
        lines.len()
    );

    ParsedDocument {
        cells,
        format,
        has_header,
    }
}
