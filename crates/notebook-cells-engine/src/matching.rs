//! # Cell Identity Matching
//!
//! When a notebook changes on disk, the freshly parsed cells have no link to
//! the cells a caller already holds (and to their execution results). This
//! module aligns the two sequences by exact content so that per-cell state can
//! be carried across the reparse.
//!
//! Matching is conservative: contents must be byte-identical, so a single
//! added space makes a cell "new". Among identical contents, old cells are
//! handed out in document order, first come first served.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::parsing::{Cell, ParsedDocument, parse_notebook};

/// A cell's content plus its position, as seen by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellContent<'a> {
    pub content: &'a str,
    pub id: usize,
}

impl<'a> CellContent<'a> {
    /// Positional contents for a cell sequence; ids are indices.
    pub fn from_cells(cells: &'a [Cell]) -> Vec<Self> {
        cells
            .iter()
            .enumerate()
            .map(|(id, cell)| CellContent {
                content: &cell.source,
                id,
            })
            .collect()
    }
}

/// Pairing of one new cell with the old cell it continues, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub new_id: usize,
    pub old_id: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    /// New cells paired with an old cell.
    pub matched: usize,
    /// New cells with no old counterpart.
    pub inserted: usize,
    /// Old cells no new cell claimed.
    pub deleted: usize,
}

pub fn match_cells(old: &[CellContent<'_>], new: &[CellContent<'_>]) -> Vec<MatchResult> {
    let mut available: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for cell in old {
        available.entry(cell.content).or_default().push_back(cell.id);
    }

    new.iter()
        .map(|cell| MatchResult {
            new_id: cell.id,
            old_id: available
                .get_mut(cell.content)
                .and_then(|slots| slots.pop_front()),
        })
        .collect()
}

pub fn match_stats(old_len: usize, results: &[MatchResult]) -> MatchStats {
    let matched = results.iter().filter(|r| r.old_id.is_some()).count();
    MatchStats {
        matched,
        inserted: results.len() - matched,
        deleted: old_len.saturating_sub(matched),
    }
}

/// Clones each matched old cell's state onto its new position.
///
/// `old_state` is indexed by old cell id; the result is indexed by new cell id.
pub fn carry_forward<T: Clone>(old_state: &[T], results: &[MatchResult]) -> Vec<Option<T>> {
    let len = results.iter().map(|r| r.new_id + 1).max().unwrap_or(0);
    let mut carried = vec![None; len];
    for result in results {
        if let Some(old_id) = result.old_id {
            carried[result.new_id] = old_state.get(old_id).cloned();
        }
    }
    carried
}

/// A reparse of externally changed text, aligned with the previous parse.
#[derive(Debug, Clone)]
pub struct Reload {
    pub document: ParsedDocument,
    pub matches: Vec<MatchResult>,
    pub stats: MatchStats,
}

pub fn reload(previous: &ParsedDocument, text: &str) -> Reload {
    let document = parse_notebook(text);
    let matches = match_cells(
        &CellContent::from_cells(&previous.cells),
        &CellContent::from_cells(&document.cells),
    );
    let stats = match_stats(previous.cells.len(), &matches);
    log::debug!(
        "reload matched {} cells, {} inserted, {} deleted",
        stats.matched,
        stats.inserted,
        stats.deleted
    );
    Reload {
        document,
        matches,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contents<'a>(sources: &[&'a str]) -> Vec<CellContent<'a>> {
        sources
            .iter()
            .enumerate()
            .map(|(id, &content)| CellContent { content, id })
            .collect()
    }

    fn old_ids(results: &[MatchResult]) -> Vec<Option<usize>> {
        results.iter().map(|r| r.old_id).collect()
    }

    #[test]
    fn identical_sequences_match_in_place() {
        let old = contents(&["a", "b", "c"]);
        let results = match_cells(&old, &old);
        assert_eq!(old_ids(&results), vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn duplicates_are_consumed_in_document_order() {
        let old = contents(&["print(\"a\")", "print(\"a\")", "print(\"a\")"]);
        let new = contents(&["print(\"a\")", "print(\"a\")"]);

        let results = match_cells(&old, &new);
        assert_eq!(old_ids(&results), vec![Some(0), Some(1)]);
        assert_eq!(
            match_stats(old.len(), &results),
            MatchStats {
                matched: 2,
                inserted: 0,
                deleted: 1
            }
        );
    }

    #[test]
    fn reordered_cells_follow_their_content() {
        let old = contents(&["a", "b", "c"]);
        let new = contents(&["c", "a", "b"]);
        let results = match_cells(&old, &new);
        assert_eq!(old_ids(&results), vec![Some(2), Some(0), Some(1)]);
    }

    #[test]
    fn whitespace_change_is_a_miss() {
        let old = contents(&["x = 1"]);
        let new = contents(&["x =  1"]);
        let results = match_cells(&old, &new);
        assert_eq!(old_ids(&results), vec![None]);
        assert_eq!(
            match_stats(old.len(), &results),
            MatchStats {
                matched: 0,
                inserted: 1,
                deleted: 1
            }
        );
    }

    #[test]
    fn inserted_cell_between_existing() {
        let old = contents(&["a", "b"]);
        let new = contents(&["a", "new", "b"]);
        let results = match_cells(&old, &new);
        assert_eq!(old_ids(&results), vec![Some(0), None, Some(1)]);
    }

    #[test]
    fn empty_inputs() {
        assert!(match_cells(&[], &[]).is_empty());
        let new = contents(&["a"]);
        assert_eq!(old_ids(&match_cells(&[], &new)), vec![None]);
    }

    #[test]
    fn carry_forward_moves_state_with_cells() {
        let old = contents(&["a", "b", "c"]);
        let new = contents(&["c", "x", "a"]);
        let results = match_cells(&old, &new);

        let outputs = vec!["out-a", "out-b", "out-c"];
        assert_eq!(
            carry_forward(&outputs, &results),
            vec![Some("out-c"), None, Some("out-a")]
        );
    }

    #[test]
    fn reload_aligns_with_previous_parse() {
        let before = parse_notebook("# Databricks notebook source\n# COMMAND ----------\na = 1\n# COMMAND ----------\nb = 2\n");
        let after = "# Databricks notebook source\n# COMMAND ----------\nb = 2\n# COMMAND ----------\nc = 3\n";

        let reloaded = reload(&before, after);
        assert_eq!(reloaded.document.cells.len(), 2);
        assert_eq!(old_ids(&reloaded.matches), vec![Some(1), None]);
        assert_eq!(
            reloaded.stats,
            MatchStats {
                matched: 1,
                inserted: 1,
                deleted: 1
            }
        );
    }
}
