//! Transport error types.
//!
//! Only startup and session-level failures live here. A failed tool call is
//! a normal JSON-RPC response and never surfaces as a `TransportError`.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that stop a transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listening socket could not be opened.
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The MCP handshake failed before the session started.
    #[error("{transport} session failed to start: {message}")]
    SessionStart {
        transport: &'static str,
        message: String,
    },

    /// A running MCP session terminated abnormally.
    #[error("{transport} session aborted: {message}")]
    SessionAborted {
        transport: &'static str,
        message: String,
    },

    /// The HTTP server stopped with an error.
    #[error("HTTP server error: {0}")]
    Http(String),
}

impl TransportError {
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    pub fn session_start(transport: &'static str, message: impl ToString) -> Self {
        Self::SessionStart {
            transport,
            message: message.to_string(),
        }
    }

    pub fn session_aborted(transport: &'static str, message: impl ToString) -> Self {
        Self::SessionAborted {
            transport,
            message: message.to_string(),
        }
    }

    pub fn http(message: impl ToString) -> Self {
        Self::Http(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_transport() {
        let err = TransportError::session_start("stdio", "handshake refused");
        assert_eq!(err.to_string(), "stdio session failed to start: handshake refused");

        let err = TransportError::bind(
            "127.0.0.1:8080",
            std::io::Error::from(std::io::ErrorKind::AddrInUse),
        );
        assert!(err.to_string().starts_with("Failed to bind to 127.0.0.1:8080"));
    }
}
