//! Error types for JPQL rendering.

use crate::ast::NodeKind;
use thiserror::Error;

/// The main error type for rendering operations.
///
/// Every variant is fatal for the render that produced it: no partial text is
/// ever returned alongside an error.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No serializer is registered for a node kind found in the query.
    #[error("Unsupported node kind: '{0}' has no registered serializer")]
    UnsupportedNodeKind(NodeKind),

    /// A literal cannot be represented in the query text.
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// A named parameter is referenced but no value is bound to it.
    #[error("Missing parameter binding: ':{0}' is referenced but not bound")]
    MissingParameterBinding(String),

    /// The query violates the structural rules of its kind.
    #[error("Invalid query shape: {0}")]
    InvalidQueryShape(String),

    /// A serializer was handed a node of another kind.
    #[error("Serializer for '{expected}' received a '{found}' node")]
    SerializerMismatch { expected: NodeKind, found: NodeKind },

    /// The writer was finalized with no text or with open parentheses.
    #[error("Incomplete output: {0}")]
    IncompleteOutput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Create an invalid shape error.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::InvalidQueryShape(message.into())
    }

    /// Create an unsupported value error.
    pub fn value(message: impl Into<String>) -> Self {
        Self::UnsupportedValue(message.into())
    }

    /// Create a mismatch error for a serializer handed the wrong node.
    pub fn mismatch(expected: NodeKind, found: NodeKind) -> Self {
        Self::SerializerMismatch { expected, found }
    }
}

/// Result type alias for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::UnsupportedNodeKind(NodeKind::from("soundex"));
        assert_eq!(
            err.to_string(),
            "Unsupported node kind: 'soundex' has no registered serializer"
        );

        let err = RenderError::MissingParameterBinding("isbn".to_string());
        assert_eq!(
            err.to_string(),
            "Missing parameter binding: ':isbn' is referenced but not bound"
        );
    }

    #[test]
    fn test_mismatch_display() {
        let err = RenderError::mismatch(NodeKind::LOWER, NodeKind::UPPER);
        assert_eq!(err.to_string(), "Serializer for 'lower' received a 'upper' node");
    }
}
