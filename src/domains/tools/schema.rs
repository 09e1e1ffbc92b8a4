//! Declarative input schemas and the shared argument validator.
//!
//! Every tool declares its inputs as an ordered list of [`FieldSpec`]s. The
//! same declaration drives two things:
//!
//! - the JSON Schema advertised to clients in `tools/list`
//! - [`InputSchema::validate`], which checks raw wire arguments field by
//!   field, in declared order, and stops at the first violation
//!
//! Per field the checks run presence, then type, then enum membership.
//! Tool-specific semantic checks happen afterwards inside the handler, on the
//! typed input produced by [`InputSchema::parse`].

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::error::{ToolError, ToolResult};

/// Primitive type of a declared input field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    /// A string restricted to the listed values.
    Enum(Vec<&'static str>),
}

impl FieldType {
    /// Name used in JSON Schema and in "must be a <type>" messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String | Self::Enum(_) => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// A single declared input field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: &'static str,
}

impl FieldSpec {
    /// A required field.
    pub fn required(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            required: true,
            default: None,
            description,
        }
    }

    /// An optional field without a default.
    pub fn optional(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            required: false,
            default: None,
            description,
        }
    }

    /// Attach a default, applied when the field is absent.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    fn check(&self, value: &Value) -> ToolResult<()> {
        if !self.field_type.matches(value) {
            return Err(ToolError::invalid_arguments(format!(
                "{} must be a {}",
                self.name,
                self.field_type.type_name()
            )));
        }

        if let FieldType::Enum(allowed) = &self.field_type {
            let member = value.as_str().is_some_and(|v| allowed.contains(&v));
            if !member {
                return Err(ToolError::invalid_arguments(format!(
                    "{} must be one of: {}",
                    self.name,
                    allowed.join(", ")
                )));
            }
        }

        Ok(())
    }

    fn to_json_schema(&self) -> Value {
        let mut property = json!({
            "type": self.field_type.type_name(),
            "description": self.description,
        });
        if let FieldType::Enum(allowed) = &self.field_type {
            property["enum"] = json!(allowed);
        }
        if let Some(default) = &self.default {
            property["default"] = default.clone();
        }
        property
    }
}

/// An ordered set of input fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    /// Create a schema from fields in declaration order.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// The declared fields, in order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validate raw arguments and return them with defaults applied.
    ///
    /// `null` values count as absent. Undeclared keys are dropped.
    pub fn validate(&self, arguments: &JsonObject) -> ToolResult<JsonObject> {
        let mut validated = JsonObject::new();

        for field in &self.fields {
            match arguments.get(field.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    field.check(value)?;
                    validated.insert(field.name.to_string(), value.clone());
                }
                None if field.required => {
                    return Err(ToolError::invalid_arguments(format!(
                        "{} is required",
                        field.name
                    )));
                }
                None => {
                    if let Some(default) = &field.default {
                        validated.insert(field.name.to_string(), default.clone());
                    }
                }
            }
        }

        Ok(validated)
    }

    /// Validate raw arguments and deserialize them into a typed input.
    pub fn parse<T: DeserializeOwned>(&self, arguments: &JsonObject) -> ToolResult<T> {
        let validated = self.validate(arguments)?;
        serde_json::from_value(Value::Object(validated))
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))
    }

    /// Render this schema as a JSON Schema object.
    pub fn to_json_schema(&self) -> JsonObject {
        let properties: JsonObject = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_json_schema()))
            .collect();

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        let mut schema = JsonObject::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), json!(required));
        schema
    }
}
