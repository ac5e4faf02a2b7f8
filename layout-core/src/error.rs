//! Error types for editor operations.

use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur at the edges of the document core.
///
/// The transition function itself never fails: commands naming unknown
/// objects are no-ops and out-of-range values are clamped. Errors only arise
/// when text crosses the boundary into or out of the core.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Imported text is not a valid snapshot or command script.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// A snapshot could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
