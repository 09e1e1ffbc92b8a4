//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Filesystem allow-list configuration.
    pub security: SecurityConfig,

    /// Tool dispatch configuration.
    pub dispatch: DispatchConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for filesystem access control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Base directories the filesystem tool may touch.
    /// Paths resolving outside all of them are rejected.
    pub allowed_directories: Vec<PathBuf>,
}

/// Configuration for the tool dispatcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Forward raw internal failure messages to callers instead of a
    /// generic message. Full details are always logged.
    pub expose_internal_errors: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let mut allowed_directories = vec![std::env::temp_dir()];
        if let Ok(cwd) = std::env::current_dir() {
            allowed_directories.push(cwd);
        }
        Self {
            allowed_directories,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "mcp-tool-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            security: SecurityConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_ALLOWED_DIRS`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        // Allow-list uses the platform path-list separator (':' on Unix, ';' on Windows)
        if let Some(dirs) = std::env::var_os("MCP_ALLOWED_DIRS") {
            let dirs: Vec<PathBuf> = std::env::split_paths(&dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if dirs.is_empty() {
                warn!("MCP_ALLOWED_DIRS is empty - keeping default allowed directories");
            } else {
                config.security.allowed_directories = dirs;
            }
        }
        info!(
            "Filesystem access limited to {:?}",
            config.security.allowed_directories
        );

        if let Ok(expose) = std::env::var("MCP_EXPOSE_INTERNAL_ERRORS") {
            config.dispatch.expose_internal_errors = parse_flag(&expose);
            if config.dispatch.expose_internal_errors {
                warn!("Internal error details will be sent to clients");
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_allow_list() {
        let config = Config::default();
        let dirs = &config.security.allowed_directories;
        assert!(dirs.contains(&std::env::temp_dir()));
        assert!(dirs.contains(&std::env::current_dir().unwrap()));
        assert!(!config.dispatch.expose_internal_errors);
    }

    #[test]
    fn test_allowed_dirs_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        let joined = std::env::join_paths(["/srv/data", "/srv/scratch"]).unwrap();
        unsafe {
            std::env::set_var("MCP_ALLOWED_DIRS", &joined);
        }
        let config = Config::from_env();
        assert_eq!(
            config.security.allowed_directories,
            vec![PathBuf::from("/srv/data"), PathBuf::from("/srv/scratch")]
        );
        unsafe {
            std::env::remove_var("MCP_ALLOWED_DIRS");
        }
    }

    #[test]
    fn test_expose_internal_errors_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_EXPOSE_INTERNAL_ERRORS", "true");
        }
        let config = Config::from_env();
        assert!(config.dispatch.expose_internal_errors);
        unsafe {
            std::env::remove_var("MCP_EXPOSE_INTERNAL_ERRORS");
        }
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("nope"));
    }
}
