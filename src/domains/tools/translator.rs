//! Result envelope and the error translator.
//!
//! Every tool call produces exactly one [`ToolCallResult`]. Failures carry an
//! [`ErrorKind`] from a closed set, which maps one-to-one onto JSON-RPC error
//! codes.

use rmcp::ErrorData as McpError;
use rmcp::model::ErrorCode;
use serde::Serialize;
use serde_json::Value;

use super::error::ToolError;

/// Protocol-level failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The requested tool is not registered.
    MethodNotFound,
    /// The arguments failed validation.
    InvalidParams,
    /// Anything not otherwise classified.
    InternalError,
}

impl ErrorKind {
    /// JSON-RPC 2.0 error code.
    pub fn code(self) -> i32 {
        match self {
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
        }
    }
}

/// Outcome of a single tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCallResult {
    Success { payload: Value },
    Failure { kind: ErrorKind, message: String },
}

impl ToolCallResult {
    pub fn success(payload: Value) -> Self {
        Self::Success { payload }
    }

    /// Build a failure. An empty message is replaced with the kind's generic one.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.fallback_message().to_string()
        } else {
            message
        };
        Self::Failure { kind, message }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure kind, if this is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Maps handler failures onto the protocol taxonomy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorTranslator {
    /// Forward raw internal failure messages to callers.
    expose_internal_errors: bool,
}

impl ErrorTranslator {
    pub fn new(expose_internal_errors: bool) -> Self {
        Self {
            expose_internal_errors,
        }
    }

    /// Classify a handler failure for the given tool.
    pub fn translate(&self, tool: &str, error: &ToolError) -> ToolCallResult {
        if error.is_validation() {
            return ToolCallResult::failure(ErrorKind::InvalidParams, error.to_string());
        }

        if self.expose_internal_errors {
            ToolCallResult::failure(ErrorKind::InternalError, error.to_string())
        } else {
            ToolCallResult::failure(
                ErrorKind::InternalError,
                format!("Internal error while executing tool '{}'", tool),
            )
        }
    }

    /// Failure for an unregistered tool name.
    pub fn unknown_tool(&self, tool: &str) -> ToolCallResult {
        ToolCallResult::failure(ErrorKind::MethodNotFound, format!("Unknown tool: {}", tool))
    }

    /// Failure for a handler that panicked.
    pub fn panicked(&self, tool: &str, detail: &str) -> ToolCallResult {
        if self.expose_internal_errors {
            ToolCallResult::failure(
                ErrorKind::InternalError,
                format!("Tool '{}' panicked: {}", tool, detail),
            )
        } else {
            ToolCallResult::failure(
                ErrorKind::InternalError,
                format!("Internal error while executing tool '{}'", tool),
            )
        }
    }
}

/// Convert a failure into an rmcp error.
pub fn to_mcp_error(kind: ErrorKind, message: String) -> McpError {
    McpError::new(ErrorCode(kind.code()), message, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::MethodNotFound.code(), -32601);
        assert_eq!(ErrorKind::InvalidParams.code(), -32602);
        assert_eq!(ErrorKind::InternalError.code(), -32603);
    }

    #[test]
    fn test_validation_errors_are_invalid_params() {
        let translator = ErrorTranslator::default();

        let result =
            translator.translate("calculator", &ToolError::invalid_arguments("a is required"));
        assert_eq!(
            result,
            ToolCallResult::failure(ErrorKind::InvalidParams, "a is required")
        );

        let result = translator.translate("filesystem", &ToolError::not_found("notes.txt"));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidParams));

        let result = translator.translate("filesystem", &ToolError::access_denied("/etc"));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidParams));
    }

    #[test]
    fn test_internal_errors_redacted_by_default() {
        let translator = ErrorTranslator::default();
        let error = ToolError::Io(std::io::Error::other("/secret/mount failed"));

        match translator.translate("filesystem", &error) {
            ToolCallResult::Failure { kind, message } => {
                assert_eq!(kind, ErrorKind::InternalError);
                assert!(!message.contains("/secret"));
                assert!(message.contains("filesystem"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_internal_errors_exposed_when_configured() {
        let translator = ErrorTranslator::new(true);
        let error = ToolError::internal("database exploded");

        match translator.translate("calculator", &error) {
            ToolCallResult::Failure { message, .. } => {
                assert_eq!(message, "Internal error: database exploded");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_message_never_empty() {
        let result = ToolCallResult::failure(ErrorKind::InvalidParams, "  ");
        match result {
            ToolCallResult::Failure { message, .. } => assert_eq!(message, "Invalid params"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tool() {
        let result = ErrorTranslator::default().unknown_tool("nonexistent");
        assert_eq!(
            result,
            ToolCallResult::failure(ErrorKind::MethodNotFound, "Unknown tool: nonexistent")
        );
    }

    #[test]
    fn test_to_mcp_error() {
        let error = to_mcp_error(ErrorKind::InvalidParams, "b is required".to_string());
        assert_eq!(error.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(error.message, "b is required");
    }
}
