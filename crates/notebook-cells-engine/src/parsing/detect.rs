use crate::markers::{CommandDelimiter, Header, PercentDelimiter};

use super::types::NotebookFormat;

/// Classifies text into a marker dialect before any splitting happens.
///
/// Order matters: the header, then any `# COMMAND` delimiter anywhere, then
/// any `# %%` line. Databricks delimiters win over percent markers even
/// without a header.
pub fn detect(text: &str) -> NotebookFormat {
    if has_header(text) {
        log::trace!("detected databricks format from header");
        return NotebookFormat::Databricks;
    }
    if text.lines().any(CommandDelimiter::matches) {
        log::trace!("detected databricks format from command delimiter");
        return NotebookFormat::Databricks;
    }
    if text.lines().any(PercentDelimiter::starts) {
        log::trace!("detected percent format");
        return NotebookFormat::Percent;
    }
    NotebookFormat::Plain
}

/// True when the first line is the Databricks header.
pub fn has_header(text: &str) -> bool {
    text.lines().next().is_some_and(Header::matches)
}
