use std::fmt;

use serde::Serialize;

use crate::parsing::types::{CellKind, ParsedDocument};

#[derive(Debug, Serialize)]
pub struct Snap {
    pub format: String,
    pub has_header: bool,
    pub cells: Vec<CellSnap>,
}

#[derive(Debug, Serialize)]
pub struct CellSnap {
    pub kind: String,
    pub language: String,
    pub lines: (usize, usize),
    pub title: Option<String>,
    pub text: String,
}

pub fn normalize(doc: &ParsedDocument) -> Snap {
    let cells = doc
        .cells
        .iter()
        .map(|cell| CellSnap {
            kind: match cell.kind {
                CellKind::Code => "code".to_string(),
                CellKind::Markup => "markup".to_string(),
            },
            language: cell.language.to_string(),
            lines: (cell.start_line, cell.end_line),
            title: cell.title.clone(),
            text: preview(&cell.source, 48),
        })
        .collect();

    Snap {
        format: doc.format.to_string(),
        has_header: doc.has_header,
        cells,
    }
}

/// Truncates to `max` characters with a "..." suffix.
fn preview(source: &str, max: usize) -> String {
    if source.chars().count() <= max {
        return source.to_string();
    }
    let mut s: String = source.chars().take(max).collect();
    s.push_str("...");
    s
}

impl fmt::Display for Snap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "format: {}, header: {}", self.format, self.has_header)?;
        for (i, cell) in self.cells.iter().enumerate() {
            write!(
                f,
                "[{i}] {}/{} {}..{}",
                cell.kind, cell.language, cell.lines.0, cell.lines.1
            )?;
            if let Some(title) = &cell.title {
                write!(f, " title={title:?}")?;
            }
            writeln!(f, " {:?}", cell.text)?;
        }
        Ok(())
    }
}
