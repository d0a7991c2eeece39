//! Object schema validation.
//!
//! This module provides [`ObjectSchema`] for validating JSON objects with
//! typed fields, unknown-key handling, and pure shape operations (`pick`,
//! `omit`, `partial`, `required`, `extend`, `merge`).

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{Issue, IssueCode, Issues};
use crate::path::JsonPath;

use super::modifiers::{Optional, Required};
use super::traits::{finish, type_failure, SchemaInfo, SchemaKind, Validator, ValueValidator};

/// How to handle input keys not declared as fields.
#[derive(Clone, Default)]
pub enum UnknownKeys {
    /// Copy unknown keys to the output untouched.
    Passthrough,
    /// Drop unknown keys from the output without reporting them.
    #[default]
    Strip,
    /// Report each unknown key as an `UNRECOGNIZED_KEYS` issue.
    Strict,
    /// Validate each unknown key's value against a schema.
    Catchall(Arc<dyn ValueValidator>),
}

/// A schema for validating JSON objects.
///
/// Every declared field is validated, and issues from all fields are
/// accumulated. A key missing from the input is passed to its field schema as
/// absent, so `optional()` fields accept it while required fields report
/// `INVALID_TYPE` with `received: undefined`. Undeclared input keys are
/// ignored: they are neither rejected nor copied to the output unless
/// [`passthrough`](Self::passthrough), [`strict`](Self::strict) or
/// [`catchall`](Self::catchall) is set.
///
/// # Example
///
/// ```rust
/// use vetter::{Schema, Validator};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min(1))
///     .field("age", Schema::number().integer().positive())
///     .field("email", Schema::string().email().optional());
///
/// let user = schema.parse(&json!({"name": "Alice", "age": 30})).unwrap();
/// assert_eq!(user["age"], json!(30));
/// assert!(!user.contains_key("email"));
///
/// let error = schema.parse(&json!({"name": "", "age": -1})).unwrap_err();
/// assert_eq!(error.issues.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ObjectSchema {
    fields: IndexMap<String, Arc<dyn ValueValidator>>,
    unknown_keys: UnknownKeys,
    type_error_message: Option<String>,
}

impl ObjectSchema {
    /// Creates a new object schema with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field. Redeclaring a name replaces its schema in place.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: ValueValidator + 'static,
    {
        self.fields.insert(name.into(), Arc::new(schema));
        self
    }

    /// Copies unknown keys to the output untouched.
    pub fn passthrough(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Passthrough;
        self
    }

    /// Drops unknown keys from the output (the default).
    pub fn strip(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strip;
        self
    }

    /// Rejects unknown keys.
    ///
    /// ```rust
    /// use vetter::{IssueCode, Schema, Validator};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object().field("id", Schema::number()).strict();
    ///
    /// let error = schema.parse(&json!({"id": 1, "admin": true})).unwrap_err();
    /// assert_eq!(error.first_issue().code, IssueCode::UnrecognizedKeys);
    /// assert_eq!(error.field, "admin");
    /// ```
    pub fn strict(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strict;
        self
    }

    /// Validates the value of every unknown key against `schema`.
    pub fn catchall<S>(mut self, schema: S) -> Self
    where
        S: ValueValidator + 'static,
    {
        self.unknown_keys = UnknownKeys::Catchall(Arc::new(schema));
        self
    }

    /// Sets the message reported when the value is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    /// Returns the declared field names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the schema of a declared field.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ValueValidator>> {
        self.fields.get(name)
    }

    /// Returns the policy applied to undeclared input keys.
    pub fn unknown_keys(&self) -> &UnknownKeys {
        &self.unknown_keys
    }

    fn with_fields(&self, fields: IndexMap<String, Arc<dyn ValueValidator>>) -> Self {
        Self {
            fields,
            unknown_keys: self.unknown_keys.clone(),
            type_error_message: self.type_error_message.clone(),
        }
    }

    /// Returns a new schema declaring only the named fields.
    ///
    /// The receiver is left unchanged:
    ///
    /// ```rust
    /// use vetter::{Schema, Validator};
    /// use serde_json::json;
    ///
    /// let full = Schema::object()
    ///     .field("a", Schema::string())
    ///     .field("b", Schema::number());
    /// let only_a = full.pick(&["a"]);
    ///
    /// assert_eq!(only_a.parse(&json!({"a": "x", "b": 7})).unwrap().len(), 1);
    /// assert!(full.parse(&json!({"a": "x"})).is_err());
    /// ```
    pub fn pick(&self, names: &[&str]) -> Self {
        self.with_fields(
            self.fields
                .iter()
                .filter(|(name, _)| names.contains(&name.as_str()))
                .map(|(name, schema)| (name.clone(), Arc::clone(schema)))
                .collect(),
        )
    }

    /// Returns a new schema without the named fields.
    pub fn omit(&self, names: &[&str]) -> Self {
        self.with_fields(
            self.fields
                .iter()
                .filter(|(name, _)| !names.contains(&name.as_str()))
                .map(|(name, schema)| (name.clone(), Arc::clone(schema)))
                .collect(),
        )
    }

    /// Returns a new schema in which every field accepts an absent key.
    pub fn partial(&self) -> Self {
        self.with_fields(
            self.fields
                .iter()
                .map(|(name, schema)| {
                    let optional: Arc<dyn ValueValidator> =
                        Arc::new(Optional::new(Arc::clone(schema)));
                    (name.clone(), optional)
                })
                .collect(),
        )
    }

    /// Returns a new schema in which every field rejects an absent key, even
    /// one that was optional or had a default.
    pub fn required(&self) -> Self {
        self.with_fields(
            self.fields
                .iter()
                .map(|(name, schema)| {
                    let required: Arc<dyn ValueValidator> =
                        Arc::new(Required::new(Arc::clone(schema)));
                    (name.clone(), required)
                })
                .collect(),
        )
    }

    /// Returns a new schema with `other`'s fields added. Fields declared by
    /// both take `other`'s schema; the unknown-key policy stays the receiver's.
    pub fn extend(&self, other: &ObjectSchema) -> Self {
        let mut fields = self.fields.clone();
        for (name, schema) in &other.fields {
            fields.insert(name.clone(), Arc::clone(schema));
        }
        self.with_fields(fields)
    }

    /// Like [`extend`](Self::extend), but the result adopts `other`'s
    /// unknown-key policy.
    pub fn merge(&self, other: &ObjectSchema) -> Self {
        let mut merged = self.extend(other);
        merged.unknown_keys = other.unknown_keys.clone();
        merged
    }

    fn check_unknown_key(
        &self,
        key: &str,
        value: &Value,
        path: &JsonPath,
        output: &mut Map<String, Value>,
        issues: &mut Vec<Issue>,
    ) {
        match &self.unknown_keys {
            UnknownKeys::Passthrough => {
                output.insert(key.to_string(), value.clone());
            }
            UnknownKeys::Strip => {}
            UnknownKeys::Strict => issues.push(
                Issue::new(
                    IssueCode::UnrecognizedKeys,
                    path.push_field(key),
                    format!("unrecognized key '{}'", key),
                )
                .with_received_value(Some(value)),
            ),
            UnknownKeys::Catchall(schema) => {
                match schema.validate_value(Some(value), &path.push_field(key)) {
                    Validation::Success(Some(v)) => {
                        output.insert(key.to_string(), v);
                    }
                    Validation::Success(None) => {}
                    Validation::Failure(e) => issues.extend(e),
                }
            }
        }
    }
}

impl SchemaInfo for ObjectSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        for schema in self.fields.values() {
            schema.collect_refs(refs);
        }
        if let UnknownKeys::Catchall(schema) = &self.unknown_keys {
            schema.collect_refs(refs);
        }
    }
}

impl Validator for ObjectSchema {
    type Output = Map<String, Value>;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Self::Output, Issues> {
        let obj = match value {
            Some(Value::Object(obj)) => obj,
            _ => return type_failure(path, "object", value, self.type_error_message.as_deref()),
        };

        let mut issues = Vec::new();
        let mut output = Map::new();

        for (name, schema) in &self.fields {
            match schema.validate_value(obj.get(name), &path.push_field(name)) {
                Validation::Success(Some(v)) => {
                    output.insert(name.clone(), v);
                }
                Validation::Success(None) => {}
                Validation::Failure(e) => issues.extend(e),
            }
        }

        for (key, value) in obj {
            if !self.fields.contains_key(key) {
                self.check_unknown_key(key, value, path, &mut output, &mut issues);
            }
        }

        finish(output, issues)
    }

    fn output_to_value(&self, output: Self::Output) -> Result<Option<Value>, String> {
        Ok(Some(Value::Object(output)))
    }
}
