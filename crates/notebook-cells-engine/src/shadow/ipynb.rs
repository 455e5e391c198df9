use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::markers::CellMagic;
use crate::parsing::lines::split_lines;
use crate::parsing::{Cell, CellClassifier, Language, NotebookFormat, ParsedDocument, RawCellSpan};
use crate::serialize::with_cell_magic;

use super::error::{Result, ShadowError};

pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 5;

/// An nbformat 4 notebook, limited to the fields the shadow needs.
///
/// Unknown metadata keys are kept so that a shadow edited by other tools
/// survives a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpynbNotebook {
    pub cells: Vec<IpynbCell>,
    #[serde(default)]
    pub metadata: NotebookMetadata,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_info: Option<LanguageInfo>,
    /// Flags needed to write the source text back in its original dialect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_cells: Option<SourceFlags>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFlags {
    pub format: NotebookFormat,
    pub has_header: bool,
}

impl Default for SourceFlags {
    fn default() -> Self {
        Self {
            format: NotebookFormat::Databricks,
            has_header: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum IpynbCell {
    Markdown {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        metadata: CellMetadata,
        source: MultilineText,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        metadata: CellMetadata,
        source: MultilineText,
        #[serde(default)]
        execution_count: Option<i64>,
        #[serde(default)]
        outputs: Vec<Value>,
    },
    Raw {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        metadata: CellMetadata,
        source: MultilineText,
    },
}

/// nbformat allows cell sources as one string or as a list of line strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultilineText {
    Lines(Vec<String>),
    Single(String),
}

impl MultilineText {
    /// Splits into lines that keep their `\n`, the layout Jupyter writes.
    pub fn from_text(text: &str) -> Self {
        MultilineText::Lines(text.split_inclusive('\n').map(str::to_string).collect())
    }

    pub fn text(&self) -> String {
        match self {
            MultilineText::Lines(lines) => lines.concat(),
            MultilineText::Single(text) => text.clone(),
        }
    }
}

/// Builds the shadow notebook for a parsed source.
///
/// SQL and shell cells gain a `%%sql`/`%%sh` first line so a Jupyter kernel
/// runs them in the right language. Outputs are always empty.
pub fn to_ipynb(doc: &ParsedDocument) -> IpynbNotebook {
    let cells = doc
        .cells
        .iter()
        .enumerate()
        .map(|(index, cell)| to_ipynb_cell(index, cell))
        .collect();

    IpynbNotebook {
        cells,
        metadata: NotebookMetadata {
            language_info: Some(LanguageInfo {
                name: Language::Python.to_string(),
            }),
            notebook_cells: Some(SourceFlags {
                format: doc.format,
                has_header: doc.has_header,
            }),
            additional: Map::new(),
        },
        nbformat: NBFORMAT,
        nbformat_minor: NBFORMAT_MINOR,
    }
}

fn to_ipynb_cell(index: usize, cell: &Cell) -> IpynbCell {
    let id = Some(format!("cell-{index}"));
    let metadata = CellMetadata {
        language: Some(cell.language),
        additional: Map::new(),
    };

    if cell.is_markup() {
        return IpynbCell::Markdown {
            id,
            metadata,
            source: MultilineText::from_text(&cell.source),
        };
    }

    IpynbCell::Code {
        id,
        metadata,
        source: MultilineText::from_text(&with_cell_magic(cell)),
        execution_count: None,
        outputs: Vec::new(),
    }
}

pub fn to_ipynb_string(doc: &ParsedDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_ipynb(doc))?)
}

/// Recovers the parsed source from a shadow notebook.
pub fn from_ipynb(notebook: &IpynbNotebook) -> Result<ParsedDocument> {
    if notebook.nbformat != NBFORMAT {
        return Err(ShadowError::UnsupportedVersion {
            major: notebook.nbformat,
            minor: notebook.nbformat_minor,
        });
    }

    let flags = notebook.metadata.notebook_cells.unwrap_or_default();
    let cells = notebook
        .cells
        .iter()
        .enumerate()
        .map(|(index, cell)| from_ipynb_cell(index, cell))
        .collect::<Result<Vec<_>>>()?;

    if flags.format == NotebookFormat::Plain && cells.len() != 1 {
        return Err(ShadowError::InvalidFormat(format!(
            "plain notebooks hold exactly one cell, found {}",
            cells.len()
        )));
    }
    if flags.has_header && flags.format != NotebookFormat::Databricks {
        return Err(ShadowError::InvalidFormat(format!(
            "a header is only valid for databricks sources, not {}",
            flags.format
        )));
    }

    Ok(ParsedDocument {
        cells,
        format: flags.format,
        has_header: flags.has_header,
    })
}

/// Parses shadow JSON, checking the version before the cell structure.
pub fn from_ipynb_str(json: &str) -> Result<ParsedDocument> {
    let value: Value = serde_json::from_str(json)?;
    let major = value
        .get("nbformat")
        .and_then(Value::as_u64)
        .ok_or_else(|| ShadowError::InvalidFormat("missing nbformat version".to_string()))?;
    let minor = value
        .get("nbformat_minor")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if major != u64::from(NBFORMAT) {
        return Err(ShadowError::UnsupportedVersion {
            major: u32::try_from(major).unwrap_or(u32::MAX),
            minor: u32::try_from(minor).unwrap_or(u32::MAX),
        });
    }

    let notebook: IpynbNotebook = serde_json::from_value(value)?;
    from_ipynb(&notebook)
}

fn from_ipynb_cell(index: usize, cell: &IpynbCell) -> Result<Cell> {
    match cell {
        IpynbCell::Markdown {
            metadata, source, ..
        } => match metadata.language {
            None | Some(Language::Markdown) => Ok(Cell::markdown(source.text())),
            Some(other) => Err(ShadowError::InvalidFormat(format!(
                "cell {index}: markdown cell tagged as {other}"
            ))),
        },
        IpynbCell::Code {
            metadata, source, ..
        } => {
            let text = source.text();
            match metadata.language {
                Some(Language::Markdown) => Err(ShadowError::InvalidFormat(format!(
                    "cell {index}: code cell tagged as markdown"
                ))),
                Some(language) => Ok(Cell::new(language, strip_cell_magic(&text, language))),
                None => Ok(classify_untagged(&text)),
            }
        }
        IpynbCell::Raw { source, .. } => {
            log::warn!("cell {index}: raw cell imported as python code");
            Ok(Cell::code(source.text()))
        }
    }
}

/// Undoes the `%%` line added by [`to_ipynb`].
fn strip_cell_magic(text: &str, language: Language) -> String {
    let selects = |line: &str| CellMagic::parse(line).is_some_and(|m| m.language() == language);
    match text.split_once('\n') {
        Some((first, rest)) if selects(first) => rest.to_string(),
        None if selects(text) => String::new(),
        _ => text.to_string(),
    }
}

/// Cells written by other tools carry no language; classify their text.
fn classify_untagged(text: &str) -> Cell {
    let lines = split_lines(text);
    let span = RawCellSpan {
        end: lines.len(),
        lines,
        start: 0,
        delimiter: None,
    };
    CellClassifier.classify(&span, NotebookFormat::Percent)
}
