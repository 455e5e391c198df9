//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts a `ParsedDocument` to a stable `Snap` whose
//!   `Display` output is compact enough for inline `insta` snapshots
//! - **`invariants`**: Runtime checks for parser correctness (line ranges in
//!   bounds and ordered, kind/language agreement, plain documents untouched)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
