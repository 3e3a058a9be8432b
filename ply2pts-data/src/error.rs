//! Error types for PLY to PTS conversion.

use thiserror::Error;

/// Errors that abort a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Malformed header: no end_header within {scanned} lines")]
    MalformedHeader { scanned: usize },

    #[error("Missing required header field: element vertex <count>")]
    MissingVertexCount,

    #[error("Unsupported PLY format: {0} (only ascii is supported)")]
    UnsupportedFormat(String),

    #[error("Vertex line {line} has {tokens} values, column {index} requested")]
    ShortVertexLine {
        line: usize,
        index: usize,
        tokens: usize,
    },

    #[error("Truncated vertex data: expected {expected} vertices, found {found}")]
    TruncatedVertexData { expected: usize, found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
