use thiserror::Error;

/// A shadow notebook that cannot be turned back into cells.
///
/// Shadows are always regenerable from the source text, so callers recover by
/// discarding the shadow and reparsing rather than by repairing it.
#[derive(Error, Debug)]
pub enum ShadowError {
    /// The shadow is not valid notebook JSON
    #[error("Failed to parse shadow notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Notebook version not supported
    #[error("Unsupported notebook version: {major}.{minor}")]
    UnsupportedVersion {
        /// Major version number
        major: u32,
        /// Minor version number
        minor: u32,
    },

    /// Valid JSON whose structure contradicts the cell model
    #[error("Invalid shadow notebook: {0}")]
    InvalidFormat(String),
}

/// Result type alias for shadow operations
pub type Result<T> = std::result::Result<T, ShadowError>;
