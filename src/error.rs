//! Error types for grid construction and loading

use thiserror::Error;

/// Errors raised when a grid cannot be built from the given description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A grid was requested with a zero (or negative) dimension.
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimension { width: i64, height: i64 },

    /// A loaded grid description does not match its declared shape.
    #[error("malformed grid data: {0}")]
    MalformedGridData(String),
}

impl GridError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        GridError::MalformedGridData(message.into())
    }
}
