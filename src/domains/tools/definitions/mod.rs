//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod calculator;
pub mod filesystem;
pub mod weather;

pub use calculator::CalculatorTool;
pub use filesystem::FilesystemTool;
pub use weather::WeatherTool;

use serde_json::Value;

/// JSON number for `value`, written as an integer when it has no fractional part.
///
/// Non-finite values have no JSON representation and become `null`.
pub(crate) fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_value() {
        assert_eq!(number_value(22.0), json!(22));
        assert_eq!(number_value(-4.0), json!(-4));
        assert_eq!(number_value(2.5), json!(2.5));
        assert_eq!(number_value(f64::NAN), Value::Null);
    }
}
