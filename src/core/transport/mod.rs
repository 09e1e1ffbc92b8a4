//! Transport layer for the MCP server.
//!
//! - **STDIO**: newline-delimited JSON-RPC on stdin/stdout (default) - feature: `stdio`
//! - **TCP**: one MCP session per accepted connection - feature: `tcp`
//! - **HTTP**: JSON-RPC over POST requests - feature: `http`
//!
//! Every transport hands tool calls to the same
//! [`ToolDispatcher`](crate::domains::tools::ToolDispatcher), so a given call
//! produces the same outcome regardless of how it arrived.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
