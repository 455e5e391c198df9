use crate::markers::{CommandDelimiter, PercentDelimiter, PercentLine};

use super::lines::trim_blank_edges;
use super::types::{NotebookFormat, RawCellSpan};

/// Partitions source lines into raw cell spans for the detected dialect.
///
/// Delimiter and header lines are consumed. For the marker dialects every span
/// is trimmed of blank edge lines and dropped if nothing remains, so a file
/// holding only a header yields no spans. Plain text yields one span covering
/// every line.
pub fn split<'a>(
    lines: &[&'a str],
    format: NotebookFormat,
    has_header: bool,
) -> Vec<RawCellSpan<'a>> {
    match format {
        NotebookFormat::Databricks => split_databricks(lines, has_header),
        NotebookFormat::Percent => split_percent(lines),
        NotebookFormat::Plain => vec![RawCellSpan {
            lines: lines.to_vec(),
            start: 0,
            end: lines.len(),
            delimiter: None,
        }],
    }
}

fn split_databricks<'a>(lines: &[&'a str], has_header: bool) -> Vec<RawCellSpan<'a>> {
    let first = usize::from(has_header).min(lines.len());
    let mut spans = Vec::new();
    let mut start = first;

    for (i, line) in lines.iter().enumerate().skip(first) {
        if CommandDelimiter::matches(line) {
            push_trimmed(&mut spans, lines, start, i, None);
            start = i + 1;
        }
    }
    push_trimmed(&mut spans, lines, start, lines.len(), None);
    spans
}

fn split_percent<'a>(lines: &[&'a str]) -> Vec<RawCellSpan<'a>> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut delimiter: Option<PercentLine> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some(next) = PercentDelimiter::parse(line) {
            push_trimmed(&mut spans, lines, start, i, delimiter.take());
            delimiter = Some(next);
            start = i + 1;
        }
    }
    push_trimmed(&mut spans, lines, start, lines.len(), delimiter);
    spans
}

fn push_trimmed<'a>(
    spans: &mut Vec<RawCellSpan<'a>>,
    lines: &[&'a str],
    start: usize,
    end: usize,
    delimiter: Option<PercentLine>,
) {
    match trim_blank_edges(lines, start, end) {
        Some((start, end)) => spans.push(RawCellSpan {
            lines: lines[start..end].to_vec(),
            start,
            end,
            delimiter,
        }),
        None => log::trace!("dropping empty span at lines {start}..{end}"),
    }
}
