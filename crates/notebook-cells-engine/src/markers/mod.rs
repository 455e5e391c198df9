//! # Marker Grammar
//!
//! Every textual marker the notebook source format recognizes lives here, one
//! module per marker kind. Detection, splitting, classification and
//! serialization all ask these types; none of them hard-code literals.
//!
//! ## Modules
//!
//! - **`header`**: the `# Databricks notebook source` first line
//! - **`command`**: `# COMMAND ----------` cell delimiters
//! - **`percent`**: `# %%` cell delimiters with optional `[tag]` and title
//! - **`magic`**: `# MAGIC` decorated lines plus `%md`/`%%sql`-style keywords

pub mod command;
pub mod header;
pub mod magic;
pub mod percent;

pub use command::CommandDelimiter;
pub use header::Header;
pub use magic::{CellMagic, LineMagic, MagicLine, MagicMatch};
pub use percent::{PercentDelimiter, PercentLine};
