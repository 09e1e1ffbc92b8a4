//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool requests to the [`ToolDispatcher`].
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and registered once, at startup, in `domains/tools/registry.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::{Error, Result};
use super::security::PathPolicy;
use crate::domains::tools::{
    ErrorTranslator, ToolCallResult, ToolDispatcher, ToolRegistry, to_mcp_error,
};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. Cloning is
/// cheap: the registry is shared behind an `Arc` and never mutated.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher over the frozen tool registry.
    dispatcher: ToolDispatcher,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails if tool registration fails or if none of the configured
    /// allowed directories exist.
    pub fn new(config: Config) -> Result<Self> {
        let policy = PathPolicy::new(&config.security);
        if policy.roots().is_empty() {
            return Err(Error::config(format!(
                "none of the allowed directories exist: {:?}",
                config.security.allowed_directories
            )));
        }

        let registry = ToolRegistry::with_default_tools(policy)?;
        let translator = ErrorTranslator::new(config.dispatch.expose_internal_errors);

        Ok(Self {
            dispatcher: ToolDispatcher::new(Arc::new(registry), translator),
            config: Arc::new(config),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the tool dispatcher (used directly by the HTTP transport).
    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Instructions sent to clients on initialize.
    pub fn instructions(&self) -> &'static str {
        "This server exposes a calculator, a simulated weather service and sandboxed file access as MCP tools."
    }
}

/// Map a dispatch outcome onto an MCP `tools/call` response.
pub fn into_call_tool_result(
    result: ToolCallResult,
) -> std::result::Result<CallToolResult, McpError> {
    match result {
        ToolCallResult::Success { payload } => {
            let text = serde_json::to_string_pretty(&payload)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult {
                content: vec![Content::text(text)],
                structured_content: Some(payload),
                is_error: Some(false),
                meta: None,
            })
        }
        ToolCallResult::Failure { kind, message } => Err(to_mcp_error(kind, message)),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions().to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        let tools = self
            .dispatcher
            .list_tools()
            .into_iter()
            .map(|d| d.to_tool())
            .collect();
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);
        let arguments = request.arguments.unwrap_or_default();
        let result = self.dispatcher.call_tool(&request.name, arguments).await;
        into_call_tool_result(result)
    }
}
