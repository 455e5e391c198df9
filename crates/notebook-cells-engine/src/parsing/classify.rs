use crate::markers::{CellMagic, LineMagic, MagicLine};

use super::lines::is_blank;
use super::types::{Cell, Language, NotebookFormat, RawCellSpan};

/// Turns raw spans into cells with a kind, a language and clean content.
///
/// Rules are tried in order and the first that applies wins:
///
/// 1. A percent span opened by `# %% [markdown]` is markdown, verbatim.
/// 2. In Databricks sources, a span whose every non-blank line is `# MAGIC`
///    decorated is stripped and classified by its leading keyword.
/// 3. A leading `%%sql`/`%%python`/`%%sh` line is removed and selects the
///    language; a leading `%sql`/`%sh`/`%pip`/`%md` selects it but stays.
/// 4. Everything else is Python, verbatim.
pub struct CellClassifier;

impl CellClassifier {
    pub fn classify(&self, span: &RawCellSpan<'_>, format: NotebookFormat) -> Cell {
        let title = span.delimiter.as_ref().and_then(|d| d.title.clone());
        let (language, source) = Self::language_and_source(span, format);

        Cell::new(language, source)
            .with_lines(span.start, span.end)
            .with_title(title)
    }

    fn language_and_source(span: &RawCellSpan<'_>, format: NotebookFormat) -> (Language, String) {
        if span.delimiter.as_ref().is_some_and(|d| d.is_markdown()) {
            return (Language::Markdown, span.lines.join("\n"));
        }

        if format == NotebookFormat::Databricks
            && let Some(found) = classify_decorated(&span.lines)
        {
            return found;
        }

        if let Some(found) = classify_inline_magic(&span.lines) {
            return found;
        }

        (Language::Python, span.lines.join("\n"))
    }
}

/// Rule for `# MAGIC` decorated cells.
///
/// Markdown, SQL and shell keywords are removed and the content trimmed. A
/// `%pip` line is shell syntax in its own right, so it stays. Unknown magics
/// such as `%run` fall back to Python and keep their exact line structure.
fn classify_decorated(lines: &[&str]) -> Option<(Language, String)> {
    let mut decorated = false;
    for line in lines.iter().filter(|l| !is_blank(l)) {
        if !MagicLine::is_decorated(line) {
            return None;
        }
        decorated = true;
    }
    if !decorated {
        return None;
    }

    let mut stripped: Vec<&str> = lines.iter().map(|l| MagicLine::strip(l)).collect();
    let Some(first) = stripped.iter().position(|l| !is_blank(l)) else {
        return Some((Language::Python, stripped.join("\n")));
    };

    match LineMagic::detect(stripped[first]) {
        Some(found) if found.magic == LineMagic::Pip => {
            Some((Language::Shellscript, stripped.join("\n").trim().to_string()))
        }
        Some(found) => {
            stripped[first] = found.rest;
            Some((found.magic.language(), stripped.join("\n").trim().to_string()))
        }
        None => Some((Language::Python, stripped.join("\n"))),
    }
}

/// Rule for undecorated `%%cell` and `%line` magics on the first content line.
fn classify_inline_magic(lines: &[&str]) -> Option<(Language, String)> {
    let first = lines.iter().position(|l| !is_blank(l))?;

    if let Some(magic) = CellMagic::parse(lines[first]) {
        return Some((magic.language(), lines[first + 1..].join("\n")));
    }

    LineMagic::detect(lines[first]).map(|found| (found.magic.language(), lines.join("\n")))
}
