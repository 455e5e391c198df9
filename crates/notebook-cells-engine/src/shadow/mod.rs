//! # Shadow Notebooks
//!
//! A shadow is an nbformat 4 (`.ipynb`) rendering of a parsed source, for
//! tools that only understand Jupyter notebooks. It can always be rebuilt from
//! the source text, which stays the single source of truth. The reverse
//! conversion exists so edits made through a shadow can be written back.

pub mod cache;
pub mod error;
pub mod ipynb;

pub use cache::{ShadowCache, content_hash};
pub use error::{Result, ShadowError};
pub use ipynb::{
    IpynbCell, IpynbNotebook, MultilineText, NotebookMetadata, SourceFlags, from_ipynb,
    from_ipynb_str, to_ipynb, to_ipynb_string,
};
