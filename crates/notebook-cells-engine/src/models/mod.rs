pub mod notebook_file;
pub mod notebook_index;

pub use notebook_file::NotebookFile;
pub use notebook_index::{NotebookEntry, NotebookIndex};
