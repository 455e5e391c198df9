use notebook_cells_engine::matching::{CellContent, match_cells};
use notebook_cells_engine::parsing::{
    Cell, CellKind, Language, NotebookFormat, ParsedDocument, parse_notebook, snapshot,
};
use notebook_cells_engine::serialize::{serialize, serialize_document};
use notebook_cells_engine::shadow::{from_ipynb_str, to_ipynb_string};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn shape(doc: &ParsedDocument) -> Vec<(CellKind, Language)> {
    doc.cells.iter().map(|c| (c.kind, c.language)).collect()
}

fn assert_round_trip(text: &str) {
    let doc = parse_notebook(text);
    snapshot::invariants(text, &doc);

    let written = serialize_document(&doc);
    let reparsed = parse_notebook(&written);
    snapshot::invariants(&written, &reparsed);

    assert_eq!(reparsed.format, doc.format, "format changed for {text:?}");
    assert_eq!(shape(&reparsed), shape(&doc), "cells changed for {text:?}");
    for (before, after) in doc.cells.iter().zip(&reparsed.cells) {
        if matches!(before.language, Language::Python | Language::Markdown | Language::Sql) {
            assert_eq!(after.source, before.source);
        }
    }
}

#[rstest]
#[case::header_only("# Databricks notebook source")]
#[case::empty("")]
#[case::plain("import os\nprint(os.getcwd())\n")]
#[case::headerless_databricks("x = 1\n# COMMAND ----------\ny = 2\n")]
#[case::decorated_sql("# Databricks notebook source\n# COMMAND ----------\n# MAGIC %sql\n# MAGIC SELECT * FROM t\n")]
#[case::pip("# Databricks notebook source\n# COMMAND ----------\n# MAGIC %pip install foo>=0.9.0\n")]
#[case::run_magic("# Databricks notebook source\n# COMMAND ----------\n# MAGIC %run ./setup\n")]
#[case::bash_spelling("# Databricks notebook source\n# COMMAND ----------\n# MAGIC %bash\n# MAGIC echo hi\n")]
#[case::undecorated_cell_magic("# Databricks notebook source\n# COMMAND ----------\n%%sql\nSELECT 1\n")]
#[case::percent_mixed("# %% [markdown]\n# Title\n\n# %%\n%%sh\nls\n\n# %% Named\nx = 1\n")]
#[case::percent_leading_code("import os\n# %%\nx = 1\n")]
#[case::empty_python_cell("# Databricks notebook source\n# COMMAND ----------\n%%python\n# COMMAND ----------\nx = 1\n")]
#[case::bare_magic_cell("# Databricks notebook source\n# COMMAND ----------\n# MAGIC\n# COMMAND ----------\nx = 1\n")]
#[case::python_leading_blank("# Databricks notebook source\n# COMMAND ----------\n%%python\n\nx = 1\n")]
#[case::decorated_leading_blank("# Databricks notebook source\n# COMMAND ----------\n# MAGIC\n# MAGIC hello\n")]
#[case::decorated_trailing_blank("# Databricks notebook source\n# COMMAND ----------\n# MAGIC %run ./setup\n# MAGIC\n")]
#[case::python_wrapping_sql_magic("# Databricks notebook source\n# COMMAND ----------\n%%python\n%sql\n")]
#[case::percent_empty_python("# %%\n%%python\n\n# %%\nx = 1\n")]
#[case::percent_leading_blank("# %%\n%%python\n\nx = 1\n")]
#[case::crlf("# Databricks notebook source\r\n# COMMAND ----------\r\n# MAGIC %md\r\n# MAGIC hi\r\n")]
fn parse_serialize_parse_is_stable(#[case] text: &str) {
    assert_round_trip(text);
}

#[rstest]
#[case(3)]
#[case(5)]
#[case(20)]
fn delimiter_dash_count_does_not_matter(#[case] dashes: usize) {
    let delimiter = format!("# COMMAND {}", "-".repeat(dashes));
    let text = format!(
        "# Databricks notebook source\n{delimiter}\nx = 1\n{delimiter}\n# MAGIC %sql\n# MAGIC SELECT 1\n"
    );

    let doc = parse_notebook(&text);
    assert_eq!(doc.format, NotebookFormat::Databricks);
    assert_eq!(
        shape(&doc),
        vec![(CellKind::Code, Language::Python), (CellKind::Code, Language::Sql)]
    );
    assert_eq!(doc.cells[0].source, "x = 1");
    assert_eq!(doc.cells[1].source, "SELECT 1");
}

#[rstest]
#[case(NotebookFormat::Databricks, true)]
#[case(NotebookFormat::Databricks, false)]
#[case(NotebookFormat::Percent, false)]
fn built_cells_survive_serialization(#[case] format: NotebookFormat, #[case] has_header: bool) {
    let cells = vec![
        Cell::markdown("# Report\n\nSome text"),
        Cell::code("import os"),
        Cell::new(Language::Sql, "SELECT 1"),
        Cell::new(Language::Shellscript, "ls -la"),
        Cell::new(Language::Shellscript, "%pip install foo"),
        Cell::code("%run ./helpers"),
    ];

    let text = serialize(&cells, format, has_header);
    let doc = parse_notebook(&text);

    assert_eq!(doc.format, format);
    assert_eq!(doc.has_header, has_header);
    let sources: Vec<_> = doc.cells.iter().map(|c| (c.language, c.source.as_str())).collect();
    assert_eq!(
        sources,
        vec![
            (Language::Markdown, "# Report\n\nSome text"),
            (Language::Python, "import os"),
            (Language::Sql, "SELECT 1"),
            (Language::Shellscript, "ls -la"),
            (Language::Shellscript, "%pip install foo"),
            (Language::Python, "%run ./helpers"),
        ]
    );
}

#[test]
fn shadow_round_trip_then_serialize_reproduces_source() {
    let text = std::fs::read_to_string(format!(
        "{}/tests/fixtures/example_notebook.py",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();

    let json = to_ipynb_string(&parse_notebook(&text)).unwrap();
    let restored = from_ipynb_str(&json).unwrap();
    assert_eq!(serialize_document(&restored), text);
}

#[test]
fn unchanged_reparse_matches_every_cell() {
    let text = "# Databricks notebook source\n# COMMAND ----------\na = 1\n# COMMAND ----------\na = 1\n# COMMAND ----------\n# MAGIC %md\n# MAGIC hi\n";
    let before = parse_notebook(text);
    let after = parse_notebook(&serialize_document(&before));

    let results = match_cells(
        &CellContent::from_cells(&before.cells),
        &CellContent::from_cells(&after.cells),
    );
    let old_ids: Vec<_> = results.iter().map(|r| r.old_id).collect();
    assert_eq!(old_ids, vec![Some(0), Some(1), Some(2)]);
}
