//! Tool-specific error types.

use thiserror::Error;

/// A specialized Result type for tool handlers.
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Errors raised by tool handlers.
///
/// Handlers never pick protocol error codes themselves; the dispatcher
/// classifies these variants through the error translator.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments failed presence, type, enum or semantic validation.
    #[error("{0}")]
    InvalidArguments(String),

    /// A path resolved outside every allow-listed directory.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The target of a filesystem operation does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// An I/O fault that has no more specific classification.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "access denied" error.
    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller can fix this failure by changing the arguments.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidArguments(_) | Self::AccessDenied(_) | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_variants() {
        assert!(ToolError::invalid_arguments("a is required").is_validation());
        assert!(ToolError::access_denied("/etc/passwd").is_validation());
        assert!(ToolError::not_found("missing.txt").is_validation());
        assert!(!ToolError::internal("boom").is_validation());

        let io = std::io::Error::other("disk on fire");
        assert!(!ToolError::from(io).is_validation());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ToolError::invalid_arguments("a is required").to_string(),
            "a is required"
        );
        assert_eq!(
            ToolError::not_found("notes.txt").to_string(),
            "File not found: notes.txt"
        );
    }
}
