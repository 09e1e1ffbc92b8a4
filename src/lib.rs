//! MCP tool server library.
//!
//! A Model Context Protocol server that advertises a fixed catalog of tools
//! and executes calls against them. Arguments are validated against each
//! tool's input schema before the tool runs, and every failure is classified
//! into a protocol error code before it reaches the client.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, path security, the MCP server
//!   handler and the transports (stdio, tcp, http)
//! - **domains::tools**: tool registry, dispatcher, error translation, schema
//!   validation and the built-in tools (`calculator`, `get_weather`,
//!   `filesystem`)
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_tool_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
pub use domains::tools::{ToolCallResult, ToolDispatcher, ToolRegistry};
