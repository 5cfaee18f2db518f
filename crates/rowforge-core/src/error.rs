//! Error types for RowForge

use thiserror::Error;

use crate::shape::ColumnType;

/// Main error type for RowForge operations
#[derive(Debug, Error)]
pub enum RowForgeError {
    /// No zero-argument constructor is known for the requested type
    #[error("no default constructor registered for '{0}'")]
    MissingConstructor(String),

    /// A cursor value could not be converted to the destination field's type
    #[error("type mismatch on '{field}': expected {expected:?}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: ColumnType,
        actual: &'static str,
    },

    /// A translation or compilation step hit an expression form it does not handle
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// A column name was requested that the cursor does not expose
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for RowForge operations
pub type Result<T> = std::result::Result<T, RowForgeError>;
