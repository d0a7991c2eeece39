//! Record schema validation: string-keyed maps with one value schema.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::Issues;
use crate::path::JsonPath;

use super::traits::{finish, type_failure, SchemaInfo, SchemaKind, Validator};

/// A schema for objects used as dictionaries.
///
/// Every entry's value is validated against the same schema, with the key
/// appended to the path, and issues from all entries are accumulated.
///
/// # Example
///
/// ```rust
/// use vetter::{Schema, Validator};
/// use serde_json::json;
///
/// let scores = Schema::record(Schema::number().nonnegative());
///
/// let parsed = scores.parse(&json!({"alice": 3, "bob": 5})).unwrap();
/// assert_eq!(parsed["bob"], 5.0);
///
/// let error = scores.parse(&json!({"alice": 3, "bob": -1})).unwrap_err();
/// assert_eq!(error.field, "bob");
/// ```
#[derive(Clone)]
pub struct RecordSchema<S> {
    values: S,
    type_error_message: Option<String>,
}

impl<S: Validator> RecordSchema<S> {
    /// Creates a record schema validating every value against `values`.
    pub fn new(values: S) -> Self {
        Self {
            values,
            type_error_message: None,
        }
    }

    /// Sets the message reported when the value is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }
}

impl<S: Validator> SchemaInfo for RecordSchema<S> {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Record
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.values.collect_refs(refs);
    }
}

impl<S: Validator> Validator for RecordSchema<S> {
    type Output = IndexMap<String, S::Output>;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Self::Output, Issues> {
        let obj = match value {
            Some(Value::Object(obj)) => obj,
            _ => return type_failure(path, "object", value, self.type_error_message.as_deref()),
        };

        let mut entries = IndexMap::with_capacity(obj.len());
        let mut issues = Vec::new();

        for (key, item) in obj {
            match self.values.validate(Some(item), &path.push_field(key)) {
                Validation::Success(v) => {
                    entries.insert(key.clone(), v);
                }
                Validation::Failure(e) => issues.extend(e),
            }
        }

        finish(entries, issues)
    }

    /// Renders each value as it is validated, so a rendering failure is
    /// reported at that entry's key.
    fn validate_to_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        let obj = match value {
            Some(Value::Object(obj)) => obj,
            _ => return type_failure(path, "object", value, self.type_error_message.as_deref()),
        };

        let mut map = Map::new();
        let mut issues = Vec::new();

        for (key, item) in obj {
            match self.values.validate_to_value(Some(item), &path.push_field(key)) {
                Validation::Success(Some(v)) => {
                    map.insert(key.clone(), v);
                }
                Validation::Success(None) => {}
                Validation::Failure(e) => issues.extend(e),
            }
        }

        finish(Some(Value::Object(map)), issues)
    }

    fn output_to_value(&self, output: Self::Output) -> Result<Option<Value>, String> {
        let mut map = Map::new();
        for (key, item) in output {
            if let Some(v) = self.values.output_to_value(item)? {
                map.insert(key, v);
            }
        }
        Ok(Some(Value::Object(map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueCode;
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn test_rejects_non_object() {
        let schema = RecordSchema::new(Schema::string());
        let errors = schema
            .validate(Some(&json!(["a"])), &JsonPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().code, IssueCode::InvalidType);
        assert_eq!(errors.first().received.as_deref(), Some(r#"["a"]"#));
    }

    #[test]
    fn test_accumulates_per_key() {
        let schema = RecordSchema::new(Schema::string().min(2));
        let errors = schema
            .validate(Some(&json!({"a": "ok", "b": "x", "c": 1})), &JsonPath::root())
            .into_result()
            .unwrap_err();

        let paths: Vec<_> = errors.iter().map(|i| i.path.to_dotted()).collect();
        assert_eq!(paths, vec!["b", "c"]);
    }

    #[test]
    fn test_empty_record_is_valid() {
        let schema = RecordSchema::new(Schema::number());
        let parsed = schema
            .validate(Some(&json!({})), &JsonPath::root())
            .into_result()
            .unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_renders_back_to_object() {
        let schema = RecordSchema::new(Schema::string().optional());
        let mut output = IndexMap::new();
        output.insert("kept".to_string(), Some("v".to_string()));
        output.insert("dropped".to_string(), None);
        assert_eq!(schema.output_to_value(output), Ok(Some(json!({"kept": "v"}))));
    }
}
