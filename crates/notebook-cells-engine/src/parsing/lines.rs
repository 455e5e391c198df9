/// Splits text into lines without terminators.
///
/// `\r\n` and `\n` both end a line; a trailing terminator does not produce a
/// final empty line. Indices into the returned vector are the line numbers
/// recorded on spans and cells.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// True when the line holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Returns the `[start, end)` range left after dropping blank lines at both
/// edges of `lines[start..end]`, or `None` when nothing but blank lines remain.
pub fn trim_blank_edges(lines: &[&str], start: usize, end: usize) -> Option<(usize, usize)> {
    if start >= end {
        return None;
    }
    let window = &lines[start..end];
    let first = window.iter().position(|l| !is_blank(l))?;
    let last = window.iter().rposition(|l| !is_blank(l))?;
    Some((start + first, start + last + 1))
}
