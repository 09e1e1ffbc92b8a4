//! Transport service - orchestrates different transport types.
//!
//! This service starts the MCP server on the configured transport and keeps
//! it running until the transport ends or the process receives Ctrl-C.

use tracing::info;

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "tcp")]
use super::tcp::TcpTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Run the transport until it finishes or a shutdown signal arrives.
    ///
    /// On shutdown the transport future is dropped, which closes any open
    /// session before the process exits.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        let transport = async move {
            match self.config {
                #[cfg(feature = "stdio")]
                TransportConfig::Stdio => StdioTransport::run(server).await,
                #[cfg(feature = "tcp")]
                TransportConfig::Tcp(cfg) => TcpTransport::new(cfg).run(server).await,
                #[cfg(feature = "http")]
                TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(server).await,
            }
        };

        tokio::select! {
            result = transport => result,
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                Ok(())
            }
        }
    }
}
