//! Schema reference type for registry-based validation.
//!
//! This module provides [`RefSchema`] which represents a reference to a named schema
//! in a registry. References enable schema reuse and recursive structures.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueCode, Issues};
use crate::path::JsonPath;
use crate::validation::ValidationContext;

use super::traits::{SchemaInfo, SchemaKind, Validator};

/// A schema that refers to another schema by name.
///
/// The name is resolved against the registry running the current parse
/// (see [`SchemaRegistry::parse`](crate::SchemaRegistry::parse) and
/// [`SchemaRegistry::enter`](crate::SchemaRegistry::enter)). Outside a
/// registry, or when the name is unknown, validation fails with
/// `UNRESOLVED_REFERENCE`; a reference chain deeper than the registry's
/// limit fails with `MAX_DEPTH_EXCEEDED`.
///
/// # Example
///
/// ```rust
/// use vetter::{Schema, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry.register("UserId", Schema::number().integer().positive()).unwrap();
/// registry.register("User", Schema::object()
///     .field("id", Schema::ref_("UserId"))
///     .field("name", Schema::string())
/// ).unwrap();
///
/// let user = registry.parse("User", &json!({"id": 42, "name": "Alice"})).unwrap();
/// assert!(user.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RefSchema {
    name: String,
}

impl RefSchema {
    /// Creates a new schema reference.
    ///
    /// This is typically called via `Schema::ref_()` rather than directly.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name of the referenced schema.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn unresolved(&self, path: &JsonPath, reason: &str) -> Validation<Option<Value>, Issues> {
        tracing::warn!(reference = %self.name, path = %path, reason, "unresolved schema reference");
        Validation::Failure(Issues::single(
            Issue::new(
                IssueCode::UnresolvedReference,
                path.clone(),
                format!("schema reference '{}' {}", self.name, reason),
            )
            .with_expected(self.name.clone()),
        ))
    }
}

impl SchemaInfo for RefSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Ref
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        refs.push(self.name.clone());
    }
}

impl Validator for RefSchema {
    /// The referenced schema's output rendered as JSON; `Null` when it
    /// accepted an absent value.
    type Output = Value;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Value, Issues> {
        self.validate_to_value(value, path)
            .map(|rendered| rendered.unwrap_or(Value::Null))
    }

    fn output_to_value(&self, output: Value) -> Result<Option<Value>, String> {
        Ok(Some(output))
    }

    fn validate_to_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        let Some(context) = ValidationContext::current() else {
            return self.unresolved(path, "cannot be resolved outside a registry");
        };

        if context.depth() >= context.max_depth() {
            return Validation::Failure(Issues::single(Issue::new(
                IssueCode::MaxDepthExceeded,
                path.clone(),
                format!(
                    "maximum reference depth {} exceeded at '{}'",
                    context.max_depth(),
                    path
                ),
            )));
        }

        let Some(schema) = context.registry().get_schema(&self.name) else {
            return self.unresolved(path, "is not registered");
        };

        context
            .increment_depth()
            .enter(|| schema.validate_value(value, path))
    }
}
