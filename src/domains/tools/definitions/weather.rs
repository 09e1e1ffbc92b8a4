//! Weather tool definition.
//!
//! Simulated weather readings. Every call draws fresh values; nothing is
//! cached and nothing is fetched from the network.

use std::sync::LazyLock;

use chrono::Utc;
use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use super::number_value;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::{ToolDefinition, ToolHandler};
use crate::domains::tools::schema::{FieldSpec, FieldType, InputSchema};

const CONDITIONS: [&str; 7] = [
    "sunny",
    "partly cloudy",
    "cloudy",
    "rainy",
    "stormy",
    "snowy",
    "foggy",
];

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Celsius,
    Fahrenheit,
}

/// Validated weather input.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherParams {
    pub city: String,
    pub units: Units,
}

// ============================================================================
// Output Structure
// ============================================================================

#[derive(Debug, Serialize)]
struct WeatherReport {
    city: String,
    temperature: Value,
    units: Units,
    condition: &'static str,
    humidity: u32,
    wind_speed: Value,
    timestamp: String,
}

/// Bits drawn from a v4 UUID, consumed a few at a time.
struct Entropy(u128);

impl Entropy {
    fn new() -> Self {
        Self(Uuid::new_v4().as_u128())
    }

    /// A value in `0..bound`.
    fn below(&mut self, bound: u32) -> u32 {
        let value = (self.0 % bound as u128) as u32;
        self.0 /= bound as u128;
        value
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Weather tool - returns simulated current weather for a city.
pub struct WeatherTool;

impl WeatherTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_weather";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get the current weather for a city (simulated data, not a live forecast).";

    /// Definition shared by registration and argument validation, built once.
    pub fn definition() -> &'static ToolDefinition {
        static DEFINITION: LazyLock<ToolDefinition> = LazyLock::new(|| {
            ToolDefinition::new(
                WeatherTool::NAME,
                WeatherTool::DESCRIPTION,
                InputSchema::new(vec![
                    FieldSpec::required("city", FieldType::String, "Name of the city"),
                    FieldSpec::optional(
                        "units",
                        FieldType::Enum(vec!["celsius", "fahrenheit"]),
                        "Temperature units",
                    )
                    .with_default(serde_json::json!("celsius")),
                ]),
            )
        });
        &DEFINITION
    }

    fn report(params: &WeatherParams) -> WeatherReport {
        let mut entropy = Entropy::new();

        // Tenths of a degree in -10.0..=35.0 °C.
        let celsius = (entropy.below(451) as f64 - 100.0) / 10.0;
        let temperature = match params.units {
            Units::Celsius => celsius,
            Units::Fahrenheit => (celsius * 9.0 / 5.0 + 32.0).round(),
        };

        WeatherReport {
            city: params.city.trim().to_string(),
            temperature: number_value(temperature),
            units: params.units,
            condition: CONDITIONS[entropy.below(CONDITIONS.len() as u32) as usize],
            humidity: 20 + entropy.below(81),
            wind_speed: number_value(entropy.below(500) as f64 / 10.0),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for WeatherTool {
    #[instrument(skip_all)]
    async fn execute(&self, arguments: &JsonObject) -> ToolResult<Value> {
        let params: WeatherParams = Self::definition().input_schema.parse(arguments)?;

        if params.city.trim().is_empty() {
            return Err(ToolError::invalid_arguments("city must not be empty"));
        }

        info!("Weather requested for '{}'", params.city.trim());

        serde_json::to_value(Self::report(&params)).map_err(|e| ToolError::internal(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
