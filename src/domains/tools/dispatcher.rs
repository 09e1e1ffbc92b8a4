//! Tool dispatcher.
//!
//! The dispatcher is the single boundary between decoded requests and tool
//! handlers. It resolves the tool name, runs the handler, and turns whatever
//! comes back (a value, a [`ToolError`], or a panic) into a
//! [`ToolCallResult`]. Nothing a handler does escapes `call_tool`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::JsonObject;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::handlers::ToolDefinition;
use super::registry::ToolRegistry;
use super::translator::{ErrorKind, ErrorTranslator, ToolCallResult};

/// Resolves and executes tool calls against a frozen registry.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    translator: ErrorTranslator,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, translator: ErrorTranslator) -> Self {
        Self {
            registry,
            translator,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// All tool definitions, in registration order.
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.registry.list_definitions().collect()
    }

    /// Call a tool with raw wire arguments.
    ///
    /// Missing (`null`) arguments are treated as an empty object; any other
    /// non-object value is rejected as invalid params.
    pub async fn call_tool_value(&self, name: &str, arguments: Value) -> ToolCallResult {
        match arguments {
            Value::Object(map) => self.call_tool(name, map).await,
            Value::Null => self.call_tool(name, JsonObject::new()).await,
            _ => {
                if self.registry.lookup(name).is_none() {
                    return self.translator.unknown_tool(name);
                }
                warn!("Arguments for '{}' are not an object", name);
                ToolCallResult::failure(ErrorKind::InvalidParams, "arguments must be an object")
            }
        }
    }

    /// Call a tool by name.
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub async fn call_tool(&self, name: &str, arguments: JsonObject) -> ToolCallResult {
        let Some(handler) = self.registry.lookup(name) else {
            warn!("Unknown tool requested: {}", name);
            return self.translator.unknown_tool(name);
        };

        info!("Dispatching tool call");

        let outcome = AssertUnwindSafe(handler.execute(&arguments))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(payload)) => {
                info!("Tool call succeeded");
                ToolCallResult::success(payload)
            }
            Ok(Err(e)) if e.is_validation() => {
                warn!("Tool call rejected: {}", e);
                self.translator.translate(name, &e)
            }
            Ok(Err(e)) => {
                error!("Tool call failed: {}", e);
                self.translator.translate(name, &e)
            }
            Err(panic) => {
                let detail = panic_message(panic.as_ref());
                error!("Tool handler panicked: {}", detail);
                self.translator.panicked(name, &detail)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SecurityConfig;
    use crate::core::security::PathPolicy;
    use crate::domains::tools::error::{ToolError, ToolResult};
    use crate::domains::tools::handlers::ToolHandler;
    use crate::domains::tools::schema::{FieldSpec, FieldType, InputSchema};
    use serde_json::json;

    struct Failing;

    #[async_trait::async_trait]
    impl ToolHandler for Failing {
        async fn execute(&self, _arguments: &JsonObject) -> ToolResult<Value> {
            Err(ToolError::Io(std::io::Error::other("/var/lib/private: disk failure")))
        }
    }

    struct Panicking;

    #[async_trait::async_trait]
    impl ToolHandler for Panicking {
        async fn execute(&self, _arguments: &JsonObject) -> ToolResult<Value> {
            panic!("handler bug");
        }
    }

    struct Echo;

    #[async_trait::async_trait]
    impl ToolHandler for Echo {
        async fn execute(&self, arguments: &JsonObject) -> ToolResult<Value> {
            let schema = InputSchema::new(vec![FieldSpec::required(
                "text",
                FieldType::String,
                "Text to echo",
            )]);
            let validated = schema.validate(arguments)?;
            Ok(Value::Object(validated))
        }
    }

    fn definition(name: &'static str) -> ToolDefinition {
        ToolDefinition::new(name, "test tool", InputSchema::default())
    }

    fn dispatcher(expose: bool) -> ToolDispatcher {
        let registry = ToolRegistry::builder()
            .register(definition("echo"), Arc::new(Echo))
            .unwrap()
            .register(definition("failing"), Arc::new(Failing))
            .unwrap()
            .register(definition("panicking"), Arc::new(Panicking))
            .unwrap()
            .build();
        ToolDispatcher::new(Arc::new(registry), ErrorTranslator::new(expose))
    }

    fn default_dispatcher() -> ToolDispatcher {
        let registry =
            ToolRegistry::with_default_tools(PathPolicy::new(&SecurityConfig::default()))
                .unwrap();
        ToolDispatcher::new(Arc::new(registry), ErrorTranslator::default())
    }

    fn args(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn result_number(result: &ToolCallResult) -> f64 {
        match result {
            ToolCallResult::Success { payload } => payload["result"].as_f64().unwrap(),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_list_tools_matches_registry() {
        let dispatcher = default_dispatcher();
        let names: Vec<_> = dispatcher.list_tools().iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["calculator", "get_weather", "filesystem"]);

        let again: Vec<_> = dispatcher.list_tools().iter().map(|d| d.name).collect();
        assert_eq!(names, again);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_method_not_found() {
        let result = dispatcher(false).call_tool("nonexistent", JsonObject::new()).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::MethodNotFound));
    }

    #[tokio::test]
    async fn test_validation_failure_is_invalid_params() {
        let result = dispatcher(false).call_tool("echo", JsonObject::new()).await;
        assert_eq!(
            result,
            ToolCallResult::failure(ErrorKind::InvalidParams, "text is required")
        );
    }

    #[tokio::test]
    async fn test_success_wraps_payload() {
        let result = dispatcher(false)
            .call_tool("echo", args(json!({ "text": "hi" })))
            .await;
        assert_eq!(result, ToolCallResult::success(json!({ "text": "hi" })));
    }

    #[tokio::test]
    async fn test_io_failure_is_internal_error() {
        let result = dispatcher(false).call_tool("failing", JsonObject::new()).await;
        match result {
            ToolCallResult::Failure { kind, message } => {
                assert_eq!(kind, ErrorKind::InternalError);
                assert!(!message.contains("/var/lib/private"));
            }
            other => panic!("expected failure, got {:?}", other),
        }

        let result = dispatcher(true).call_tool("failing", JsonObject::new()).await;
        match result {
            ToolCallResult::Failure { message, .. } => {
                assert!(message.contains("disk failure"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_panic_does_not_escape() {
        let result = dispatcher(false).call_tool("panicking", JsonObject::new()).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::InternalError));

        let result = dispatcher(true).call_tool("panicking", JsonObject::new()).await;
        match result {
            ToolCallResult::Failure { message, .. } => assert!(message.contains("handler bug")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_tool_value_argument_shapes() {
        let dispatcher = dispatcher(false);

        let result = dispatcher.call_tool_value("echo", Value::Null).await;
        assert_eq!(
            result,
            ToolCallResult::failure(ErrorKind::InvalidParams, "text is required")
        );

        let result = dispatcher.call_tool_value("echo", json!([1, 2])).await;
        assert_eq!(
            result,
            ToolCallResult::failure(ErrorKind::InvalidParams, "arguments must be an object")
        );

        let result = dispatcher.call_tool_value("nonexistent", json!("x")).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::MethodNotFound));
    }

    #[tokio::test]
    async fn test_calculator_calls() {
        let dispatcher = default_dispatcher();

        let result = dispatcher
            .call_tool("calculator", args(json!({ "operation": "add", "a": 15, "b": 7 })))
            .await;
        assert_eq!(result_number(&result), 22.0);

        let result = dispatcher
            .call_tool("calculator", args(json!({ "operation": "multiply", "a": 8, "b": 9 })))
            .await;
        assert_eq!(result_number(&result), 72.0);

        let result = dispatcher
            .call_tool("calculator", args(json!({ "operation": "sqrt", "a": 144 })))
            .await;
        assert_eq!(result_number(&result), 12.0);

        let result = dispatcher
            .call_tool("calculator", args(json!({ "operation": "divide", "a": 10, "b": 0 })))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidParams));

        let result = dispatcher
            .call_tool("calculator", args(json!({ "operation": "sqrt", "a": -1 })))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidParams));
    }

    #[tokio::test]
    async fn test_weather_call() {
        let result = default_dispatcher()
            .call_tool("get_weather", args(json!({ "city": "Lisbon" })))
            .await;
        assert!(result.is_success());

        let result = default_dispatcher()
            .call_tool("get_weather", args(json!({ "city": "Lisbon", "units": "kelvin" })))
            .await;
        assert_eq!(
            result,
            ToolCallResult::failure(
                ErrorKind::InvalidParams,
                "units must be one of: celsius, fahrenheit"
            )
        );
    }
}
