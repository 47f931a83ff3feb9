//! Error types for format operations

use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Storage fragment is not well-formed, even after entity substitution
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// Front matter could not be serialized back to YAML
    #[error("Front matter error: {0}")]
    FrontMatter(String),
}
