//! STDIO transport implementation.
//!
//! Newline-delimited JSON-RPC over stdin/stdout, framed by rmcp. Logs go to
//! stderr so they never corrupt the protocol stream.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve a single MCP session on stdin/stdout until the client disconnects.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::session_start("stdio", e))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| TransportError::session_aborted("stdio", e))?;

        info!("STDIO session closed: {:?}", reason);
        Ok(())
    }
}
