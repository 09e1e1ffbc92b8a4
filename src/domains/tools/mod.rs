//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are named, schema-described operations that MCP clients can list
//! and call.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `schema.rs` - Declarative input schemas and the shared validator
//! - `handlers.rs` - `ToolDefinition` and the `ToolHandler` trait
//! - `registry.rs` - Startup-time registration, frozen afterwards
//! - `dispatcher.rs` - Lookup, execution and result normalization
//! - `translator.rs` - Result envelope and error classification
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Declare its `definition()` and implement `ToolHandler`
//! 3. Export it in `definitions/mod.rs`
//! 4. Register it in `ToolRegistry::with_default_tools`
//!
//! **No need to modify `server.rs` or the transports.**

pub mod definitions;
mod dispatcher;
mod error;
mod handlers;
mod registry;
pub mod schema;
mod translator;

pub use dispatcher::ToolDispatcher;
pub use error::{ToolError, ToolResult};
pub use handlers::{ToolDefinition, ToolHandler};
pub use registry::{RegistryError, ToolRegistration, ToolRegistry, ToolRegistryBuilder};
pub use translator::{ErrorKind, ErrorTranslator, ToolCallResult, to_mcp_error};
