//! Tool handler trait and tool definitions.
//!
//! A tool is a [`ToolDefinition`] (what clients see in `tools/list`) paired
//! with a [`ToolHandler`] (what runs on `tools/call`). Handlers own the
//! validation of their arguments; see [`super::schema`].

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::Value;

use super::error::ToolResult;
use super::schema::InputSchema;

/// Static descriptor of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    /// Unique, stable identifier.
    pub name: &'static str,

    /// Human-readable description shown to clients.
    pub description: &'static str,

    /// Declared input fields.
    pub input_schema: InputSchema,
}

impl ToolDefinition {
    pub fn new(name: &'static str, description: &'static str, input_schema: InputSchema) -> Self {
        Self {
            name,
            description,
            input_schema,
        }
    }

    /// Create a Tool model for this definition (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.into(),
            description: Some(self.description.into()),
            input_schema: Arc::new(self.input_schema.to_json_schema()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// JSON form used by the HTTP transport.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema.to_json_schema(),
        })
    }
}

/// The executable side of a tool.
///
/// Implementations validate `arguments` against their own schema before
/// doing any work and report problems as [`super::ToolError`]s.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with the given raw arguments.
    async fn execute(&self, arguments: &JsonObject) -> ToolResult<Value>;
}
