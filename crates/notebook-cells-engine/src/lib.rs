pub mod io;
pub mod markers;
pub mod matching;
pub mod models;
pub mod parsing;
pub mod serialize;
pub mod shadow;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use io::*;
pub use matching::{
    CellContent, MatchResult, MatchStats, Reload, carry_forward, match_cells, match_stats, reload,
};
pub use models::{NotebookEntry, NotebookFile, NotebookIndex};
pub use parsing::{Cell, CellKind, Language, NotebookFormat, ParsedDocument, parse_notebook};
pub use serialize::{SerializeOptions, serialize, serialize_document, serialize_with};
pub use shadow::{ShadowCache, ShadowError};
