//! Tool Registry - central registration and lookup for all tools.
//!
//! Tools are registered once, at startup, through a [`ToolRegistryBuilder`].
//! Building freezes the set: a [`ToolRegistry`] has no mutating methods and is
//! shared read-only (behind an `Arc`) for the rest of the process.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::security::PathPolicy;

use super::definitions::{CalculatorTool, FilesystemTool, WeatherTool};
use super::handlers::{ToolDefinition, ToolHandler};

/// Startup-time registration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool with this name is already registered.
    #[error("Duplicate tool name: {0}")]
    DuplicateToolName(String),
}

/// A definition paired with the handler that backs it.
#[derive(Clone)]
pub struct ToolRegistration {
    pub definition: ToolDefinition,
    pub handler: Arc<dyn ToolHandler>,
}

/// Collects registrations before the registry is frozen.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    registrations: Vec<ToolRegistration>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails if the name is already taken.
    pub fn register(
        mut self,
        definition: ToolDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<Self, RegistryError> {
        if self.index.contains_key(definition.name) {
            return Err(RegistryError::DuplicateToolName(definition.name.to_string()));
        }

        debug!("Registering tool '{}'", definition.name);
        self.index.insert(definition.name, self.registrations.len());
        self.registrations.push(ToolRegistration {
            definition,
            handler,
        });
        Ok(self)
    }

    /// Freeze the registrations.
    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            registrations: self.registrations,
            index: self.index,
        }
    }
}

/// Immutable mapping from tool name to registration.
pub struct ToolRegistry {
    registrations: Vec<ToolRegistration>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    /// Build the registry with every tool this server ships.
    pub fn with_default_tools(policy: PathPolicy) -> Result<Self, RegistryError> {
        let registry = Self::builder()
            .register(CalculatorTool::definition().clone(), Arc::new(CalculatorTool))?
            .register(WeatherTool::definition().clone(), Arc::new(WeatherTool))?
            .register(
                FilesystemTool::definition().clone(),
                Arc::new(FilesystemTool::with_policy(policy)),
            )?
            .build();

        info!("Registered {} tools: {:?}", registry.len(), registry.names());
        Ok(registry)
    }

    /// Find the handler registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.index
            .get(name)
            .map(|&i| &self.registrations[i].handler)
    }

    /// All definitions, in registration order.
    pub fn list_definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.registrations.iter().map(|r| &r.definition)
    }

    /// All tool names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.list_definitions().map(|d| d.name).collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SecurityConfig;
    use crate::domains::tools::error::ToolResult;
    use crate::domains::tools::schema::InputSchema;
    use rmcp::model::JsonObject;
    use serde_json::Value;

    struct Noop;

    #[async_trait::async_trait]
    impl ToolHandler for Noop {
        async fn execute(&self, _arguments: &JsonObject) -> ToolResult<Value> {
            Ok(Value::Null)
        }
    }

    fn definition(name: &'static str) -> ToolDefinition {
        ToolDefinition::new(name, "test tool", InputSchema::default())
    }

    #[test]
    fn test_registry_tool_names() {
        let registry =
            ToolRegistry::with_default_tools(PathPolicy::new(&SecurityConfig::default()))
                .unwrap();
        assert_eq!(registry.names(), vec!["calculator", "get_weather", "filesystem"]);
    }

    #[test]
    fn test_registered_definitions_are_the_validated_ones() {
        let registry =
            ToolRegistry::with_default_tools(PathPolicy::new(&SecurityConfig::default()))
                .unwrap();
        let registered: Vec<_> = registry.list_definitions().collect();

        assert_eq!(registered[0], CalculatorTool::definition());
        assert_eq!(registered[1], WeatherTool::definition());
        assert_eq!(registered[2], FilesystemTool::definition());

        assert!(std::ptr::eq(
            CalculatorTool::definition(),
            CalculatorTool::definition()
        ));
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let registry = ToolRegistry::builder()
            .register(definition("zeta"), Arc::new(Noop))
            .unwrap()
            .register(definition("alpha"), Arc::new(Noop))
            .unwrap()
            .register(definition("mid"), Arc::new(Noop))
            .unwrap()
            .build();

        assert_eq!(registry.names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = ToolRegistry::builder()
            .register(definition("echo"), Arc::new(Noop))
            .unwrap()
            .register(definition("echo"), Arc::new(Noop));

        assert_eq!(
            result.err(),
            Some(RegistryError::DuplicateToolName("echo".to_string()))
        );
    }

    #[test]
    fn test_lookup() {
        let registry = ToolRegistry::builder()
            .register(definition("echo"), Arc::new(Noop))
            .unwrap()
            .build();

        assert!(registry.lookup("echo").is_some());
        assert!(registry.lookup("unknown").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::builder().build();
        assert!(registry.is_empty());
        assert_eq!(registry.list_definitions().count(), 0);
    }
}
