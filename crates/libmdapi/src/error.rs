use thiserror::Error;

/// Errors surfaced by the extraction engine.
///
/// Problems with the document being extracted are never reported here; they are recovered
/// locally and logged. Only caller contract violations and output failures are errors.
#[derive(Error, Debug)]
pub enum ApiDocError {
    #[error("Expected a {expected} node, found {found}")]
    UnexpectedNode {
        /// Node kind the operation requires.
        expected: &'static str,
        /// Node kind that was supplied.
        found: &'static str,
    },

    #[error("Child index {index} is out of bounds for a node with {len} children")]
    ChildOutOfBounds {
        /// Requested slot.
        index: usize,
        /// Number of children the parent holds.
        len: usize,
    },

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Highlighting error: {0}")]
    Highlight(String),
}

impl From<syntect::Error> for ApiDocError {
    fn from(err: syntect::Error) -> Self {
        Self::Highlight(err.to_string())
    }
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ApiDocError>;
