//! Calculator tool definition.
//!
//! Basic arithmetic over JSON numbers.

use std::sync::LazyLock;

use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use super::number_value;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{ToolDefinition, ToolHandler};
use crate::domains::tools::schema::{FieldSpec, FieldType, InputSchema};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Sqrt,
}

impl Operation {
    const NAMES: [&'static str; 6] = ["add", "subtract", "multiply", "divide", "power", "sqrt"];

    fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Sqrt => "sqrt",
        }
    }

    fn is_unary(self) -> bool {
        matches!(self, Self::Sqrt)
    }
}

/// Validated calculator input.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorParams {
    pub operation: Operation,
    pub a: f64,
    pub b: Option<f64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Calculator tool - add, subtract, multiply, divide, power and square root.
pub struct CalculatorTool;

impl CalculatorTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "calculator";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Perform basic arithmetic: add, subtract, multiply, divide, power (a^b) and sqrt (square root of a).";

    /// Definition shared by registration and argument validation, built once.
    pub fn definition() -> &'static ToolDefinition {
        static DEFINITION: LazyLock<ToolDefinition> = LazyLock::new(|| {
            ToolDefinition::new(
                CalculatorTool::NAME,
                CalculatorTool::DESCRIPTION,
                InputSchema::new(vec![
                    FieldSpec::required(
                        "operation",
                        FieldType::Enum(Operation::NAMES.to_vec()),
                        "The arithmetic operation to perform",
                    ),
                    FieldSpec::required("a", FieldType::Number, "First operand"),
                    FieldSpec::optional(
                        "b",
                        FieldType::Number,
                        "Second operand (not used by sqrt)",
                    ),
                ]),
            )
        });
        &DEFINITION
    }

    /// Compute the result for already-validated params.
    pub fn compute(params: &CalculatorParams) -> ToolResult<f64> {
        let a = params.a;

        let b = match (params.operation.is_unary(), params.b) {
            (true, _) => 0.0,
            (false, Some(b)) => b,
            (false, None) => {
                return Err(ToolError::invalid_arguments(format!(
                    "b is required for {}",
                    params.operation.as_str()
                )));
            }
        };

        let result = match params.operation {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0.0 {
                    return Err(ToolError::invalid_arguments("Division by zero is not allowed"));
                }
                a / b
            }
            Operation::Power => a.powf(b),
            Operation::Sqrt => {
                if a < 0.0 {
                    return Err(ToolError::invalid_arguments(
                        "Cannot calculate square root of negative number",
                    ));
                }
                a.sqrt()
            }
        };

        if !result.is_finite() {
            return Err(ToolError::invalid_arguments("Result is not a finite number"));
        }

        Ok(result)
    }
}

#[async_trait::async_trait]
impl ToolHandler for CalculatorTool {
    #[instrument(skip_all)]
    async fn execute(&self, arguments: &JsonObject) -> ToolResult<Value> {
        let params: CalculatorParams = Self::definition().input_schema.parse(arguments)?;
        let result = Self::compute(&params)?;

        info!("{:?}({}, {:?}) = {}", params.operation, params.a, params.b, result);

        let mut payload = serde_json::json!({
            "operation": params.operation,
            "a": number_value(params.a),
            "result": number_value(result),
        });
        if let (false, Some(b)) = (params.operation.is_unary(), params.b) {
            payload["b"] = number_value(b);
        }
        Ok(payload)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::assert_err;

    async fn call(arguments: Value) -> ToolResult<Value> {
        CalculatorTool
            .execute(arguments.as_object().unwrap())
            .await
    }

    fn message(result: ToolResult<Value>) -> String {
        match result {
            Err(ToolError::InvalidArguments(msg)) => msg,
            other => panic!("expected invalid arguments, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add() {
        let payload = call(json!({ "operation": "add", "a": 15, "b": 7 })).await.unwrap();
        assert_eq!(payload["result"], json!(22));
        assert_eq!(payload["operation"], "add");
        assert_eq!(payload["a"], json!(15));
        assert_eq!(payload["b"], json!(7));
    }

    #[tokio::test]
    async fn test_multiply_and_subtract() {
        let payload = call(json!({ "operation": "multiply", "a": 8, "b": 9 })).await.unwrap();
        assert_eq!(payload["result"], json!(72));

        let payload = call(json!({ "operation": "subtract", "a": 2, "b": 5.5 })).await.unwrap();
        assert_eq!(payload["result"], json!(-3.5));
    }

    #[tokio::test]
    async fn test_sqrt_ignores_b() {
        let payload = call(json!({ "operation": "sqrt", "a": 144, "b": 3 })).await.unwrap();
        assert_eq!(payload["result"], json!(12));
        assert!(payload.get("b").is_none());
    }

    #[tokio::test]
    async fn test_power() {
        let payload = call(json!({ "operation": "power", "a": 2, "b": 10 })).await.unwrap();
        assert_eq!(payload["result"], json!(1024));
    }

    #[tokio::test]
    async fn test_divide_by_zero() {
        let result = call(json!({ "operation": "divide", "a": 10, "b": 0 })).await;
        assert_eq!(message(result), "Division by zero is not allowed");
    }

    #[tokio::test]
    async fn test_sqrt_of_negative() {
        let result = call(json!({ "operation": "sqrt", "a": -1 })).await;
        assert_eq!(message(result), "Cannot calculate square root of negative number");
    }

    #[tokio::test]
    async fn test_binary_operation_needs_b() {
        let result = call(json!({ "operation": "divide", "a": 10 })).await;
        assert_eq!(message(result), "b is required for divide");
    }

    #[tokio::test]
    async fn test_overflow_rejected() {
        let result = call(json!({ "operation": "power", "a": 10, "b": 400 })).await;
        assert_eq!(message(result), "Result is not a finite number");
    }

    #[tokio::test]
    async fn test_schema_violations() {
        let result = call(json!({ "operation": "modulo", "a": 1, "b": 2 })).await;
        assert_eq!(
            message(result),
            "operation must be one of: add, subtract, multiply, divide, power, sqrt"
        );

        let result = call(json!({ "a": 1, "b": 2 })).await;
        assert_eq!(message(result), "operation is required");

        assert_err!(call(json!({ "operation": "add", "a": "1", "b": 2 })).await);
    }

    #[test]
    fn test_definition_schema() {
        let tool = CalculatorTool::definition().to_tool();
        assert_eq!(tool.name, "calculator");
        assert_eq!(tool.input_schema["required"], json!(["operation", "a"]));
    }
}
