//! Boolean schema validation.

use serde_json::Value;
use stillwater::Validation;

use crate::error::Issues;
use crate::path::JsonPath;

use super::traits::{type_failure, SchemaInfo, SchemaKind, Validator};

/// A schema accepting `true` or `false`.
///
/// Booleans carry no constraints; `.error(msg)` customizes the type error.
#[derive(Clone, Default)]
pub struct BooleanSchema {
    type_error_message: Option<String>,
}

impl BooleanSchema {
    /// Creates a boolean schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message reported when the value is not a boolean.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl SchemaInfo for BooleanSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Boolean
    }
}

impl Validator for BooleanSchema {
    type Output = bool;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<bool, Issues> {
        match value.and_then(Value::as_bool) {
            Some(b) => Validation::Success(b),
            None => type_failure(path, "boolean", value, self.type_error_message.as_deref()),
        }
    }

    fn output_to_value(&self, output: bool) -> Result<Option<Value>, String> {
        Ok(Some(Value::Bool(output)))
    }
}
