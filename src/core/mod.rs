//! Shared infrastructure: configuration, errors, path security, the MCP
//! server handler and the transport layer.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{PathPolicy, PathSecurityError};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
