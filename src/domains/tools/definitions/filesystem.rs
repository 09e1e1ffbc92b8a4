//! Filesystem tool definition.
//!
//! Read, write, list, delete and existence checks, confined to the
//! allow-listed base directories of [`PathPolicy`].

use std::io;
use std::path::Path;
use std::sync::LazyLock;

use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::core::config::SecurityConfig;
use crate::core::security::{PathPolicy, PathSecurityError};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{ToolDefinition, ToolHandler};
use crate::domains::tools::schema::{FieldSpec, FieldType, InputSchema};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FsOperation {
    Read,
    Write,
    List,
    Delete,
    Exists,
}

/// Validated filesystem input.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesystemParams {
    pub operation: FsOperation,
    pub path: String,
    pub content: Option<String>,
    pub recursive: bool,
}

// ============================================================================
// Output Structure
// ============================================================================

#[derive(Debug, Serialize)]
struct DirEntry {
    name: String,
    #[serde(rename = "type")]
    item_type: &'static str,
}

fn item_type(metadata: &std::fs::Metadata) -> &'static str {
    if metadata.file_type().is_symlink() {
        "symlink"
    } else if metadata.is_dir() {
        "directory"
    } else if metadata.is_file() {
        "file"
    } else {
        "other"
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Filesystem tool - sandboxed file access.
pub struct FilesystemTool {
    policy: PathPolicy,
}

impl FilesystemTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "filesystem";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Read, write, list, delete or check files. Access is limited to the server's allowed directories. Use recursive=true to delete non-empty directories.";

    pub fn new(config: &SecurityConfig) -> Self {
        Self::with_policy(PathPolicy::new(config))
    }

    pub fn with_policy(policy: PathPolicy) -> Self {
        Self { policy }
    }

    /// Definition shared by registration and argument validation, built once.
    pub fn definition() -> &'static ToolDefinition {
        static DEFINITION: LazyLock<ToolDefinition> = LazyLock::new(|| {
            ToolDefinition::new(
                FilesystemTool::NAME,
                FilesystemTool::DESCRIPTION,
                InputSchema::new(vec![
                    FieldSpec::required(
                        "operation",
                        FieldType::Enum(vec!["read", "write", "list", "delete", "exists"]),
                        "The file operation to perform",
                    ),
                    FieldSpec::required(
                        "path",
                        FieldType::String,
                        "Path to the file or directory",
                    ),
                    FieldSpec::optional(
                        "content",
                        FieldType::String,
                        "Content to write (required for write)",
                    ),
                    FieldSpec::optional(
                        "recursive",
                        FieldType::Boolean,
                        "Delete non-empty directories and their contents",
                    )
                    .with_default(json!(false)),
                ]),
            )
        });
        &DEFINITION
    }

    async fn read(path: &Path, shown: &str) -> ToolResult<Value> {
        let metadata = fs::metadata(path).await.map_err(|e| io_error(shown, e))?;
        if metadata.is_dir() {
            return Err(ToolError::invalid_arguments(format!(
                "Path is a directory: {}",
                shown
            )));
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                ToolError::invalid_arguments(format!("File is not valid UTF-8 text: {}", shown))
            } else {
                io_error(shown, e)
            }
        })?;

        info!("Read {} bytes from '{}'", content.len(), shown);
        Ok(json!({
            "path": shown,
            "content": content,
            "size": content.len(),
        }))
    }

    async fn write(path: &Path, shown: &str, content: Option<&str>) -> ToolResult<Value> {
        let Some(content) = content else {
            return Err(ToolError::invalid_arguments(
                "content is required for write operation",
            ));
        };

        if fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
            return Err(ToolError::invalid_arguments(format!(
                "Path is a directory: {}",
                shown
            )));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(shown, e))?;
        }
        fs::write(path, content)
            .await
            .map_err(|e| io_error(shown, e))?;

        info!("Wrote {} bytes to '{}'", content.len(), shown);
        Ok(json!({
            "path": shown,
            "bytes_written": content.len(),
        }))
    }

    async fn list(path: &Path, shown: &str) -> ToolResult<Value> {
        let metadata = fs::metadata(path).await.map_err(|e| io_error(shown, e))?;
        if !metadata.is_dir() {
            return Err(ToolError::invalid_arguments(format!(
                "Path is not a directory: {}",
                shown
            )));
        }

        let mut reader = fs::read_dir(path).await.map_err(|e| io_error(shown, e))?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| io_error(shown, e))? {
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    warn!("Failed to get metadata for {:?}: {}", entry.file_name(), e);
                    continue;
                }
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                item_type: item_type(&metadata),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        info!("Listed {} entries in '{}'", entries.len(), shown);
        Ok(json!({
            "path": shown,
            "entries": entries,
        }))
    }

    async fn delete(path: &Path, shown: &str, recursive: bool) -> ToolResult<Value> {
        let metadata = fs::symlink_metadata(path)
            .await
            .map_err(|e| io_error(shown, e))?;
        let kind = item_type(&metadata);

        let removed = if metadata.is_dir() {
            if recursive {
                fs::remove_dir_all(path).await
            } else {
                let mut reader = fs::read_dir(path).await.map_err(|e| io_error(shown, e))?;
                if reader
                    .next_entry()
                    .await
                    .map_err(|e| io_error(shown, e))?
                    .is_some()
                {
                    return Err(ToolError::invalid_arguments(format!(
                        "Directory is not empty: {}. Use recursive=true to delete it and its contents.",
                        shown
                    )));
                }
                fs::remove_dir(path).await
            }
        } else {
            fs::remove_file(path).await
        };
        removed.map_err(|e| io_error(shown, e))?;

        info!("Deleted {} '{}'", kind, shown);
        Ok(json!({
            "path": shown,
            "deleted": true,
            "type": kind,
        }))
    }

    async fn exists(path: &Path, shown: &str) -> ToolResult<Value> {
        match fs::metadata(path).await {
            Ok(metadata) => Ok(json!({
                "path": shown,
                "exists": true,
                "type": item_type(&metadata),
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(json!({
                "path": shown,
                "exists": false,
            })),
            Err(e) => Err(io_error(shown, e)),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for FilesystemTool {
    #[instrument(skip_all)]
    async fn execute(&self, arguments: &JsonObject) -> ToolResult<Value> {
        let params: FilesystemParams = Self::definition().input_schema.parse(arguments)?;
        let shown = params.path.as_str();

        info!("Filesystem {:?} on '{}'", params.operation, shown);

        // Delete acts on the entry itself, so a trailing symlink is not followed.
        let resolved = match params.operation {
            FsOperation::Delete => self.policy.resolve_entry(shown).await,
            _ => self.policy.resolve(shown).await,
        };
        let path = resolved.map_err(|e| {
            warn!("Path security validation failed: {}", e);
            match e {
                PathSecurityError::EmptyPath => ToolError::invalid_arguments(e.to_string()),
                PathSecurityError::OutsideAllowedDirectories { .. } => {
                    ToolError::access_denied(e.to_string())
                }
                PathSecurityError::CannotResolve { error, .. } => ToolError::Io(error),
            }
        })?;

        match params.operation {
            FsOperation::Read => Self::read(&path, shown).await,
            FsOperation::Write => Self::write(&path, shown, params.content.as_deref()).await,
            FsOperation::List => Self::list(&path, shown).await,
            FsOperation::Delete if self.policy.roots().contains(&path) => {
                Err(ToolError::invalid_arguments(format!(
                    "Refusing to delete an allowed base directory: {}",
                    shown
                )))
            }
            FsOperation::Delete => Self::delete(&path, shown, params.recursive).await,
            FsOperation::Exists => Self::exists(&path, shown).await,
        }
    }
}

/// Classify an I/O failure on a caller-supplied path.
fn io_error(shown: &str, e: io::Error) -> ToolError {
    match e.kind() {
        io::ErrorKind::NotFound => ToolError::not_found(shown),
        io::ErrorKind::PermissionDenied => {
            ToolError::access_denied(format!("permission denied for {}", shown))
        }
        _ => ToolError::Io(e),
    }
}

// ============================================================================
// Tests
// ============================================================================
