//! Exact-value schemas: a single literal, or membership in a fixed set.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueCode, Issues};
use crate::path::JsonPath;

use super::traits::{SchemaInfo, SchemaKind, Validator};

/// Numbers compare by value, so `1` matches `1.0`.
fn same_value(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => expected == actual,
    }
}

/// A schema accepting exactly one value.
///
/// ```rust
/// use vetter::{IssueCode, Schema, Validator};
/// use serde_json::json;
///
/// let kind = Schema::literal("circle");
/// assert_eq!(kind.parse(&json!("circle")).unwrap(), json!("circle"));
///
/// let error = kind.parse(&json!("square")).unwrap_err();
/// assert_eq!(error.first_issue().code, IssueCode::InvalidLiteral);
/// ```
#[derive(Clone)]
pub struct LiteralSchema {
    value: Value,
    message: Option<String>,
}

impl LiteralSchema {
    /// Creates a schema accepting only a value equal to `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            message: None,
        }
    }

    /// Returns the accepted value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Sets the message reported on mismatch.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl SchemaInfo for LiteralSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Literal
    }
}

impl Validator for LiteralSchema {
    type Output = Value;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Value, Issues> {
        match value {
            Some(actual) if same_value(&self.value, actual) => Validation::Success(actual.clone()),
            _ => {
                let message = self
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("expected literal {}", self.value));
                Validation::Failure(Issues::single(
                    Issue::new(IssueCode::InvalidLiteral, path.clone(), message)
                        .with_expected(self.value.to_string())
                        .with_received_value(value),
                ))
            }
        }
    }

    fn output_to_value(&self, output: Value) -> Result<Option<Value>, String> {
        Ok(Some(output))
    }
}

/// A schema accepting any member of a fixed set of values.
///
/// ```rust
/// use vetter::{IssueCode, Schema, Validator};
/// use serde_json::json;
///
/// let role = Schema::enum_(["admin", "user", "guest"]);
/// assert!(role.parse(&json!("guest")).is_ok());
///
/// let error = role.parse(&json!("root")).unwrap_err();
/// assert_eq!(error.first_issue().code, IssueCode::InvalidEnum);
/// assert_eq!(error.expected.as_deref(), Some(r#"one of ["admin","user","guest"]"#));
/// ```
#[derive(Clone)]
pub struct EnumSchema {
    options: Vec<Value>,
    message: Option<String>,
}

impl EnumSchema {
    /// Creates a schema accepting any value equal to one of `options`.
    pub fn new<I, V>(options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    /// Returns the accepted values in declaration order.
    pub fn options(&self) -> &[Value] {
        &self.options
    }

    /// Sets the message reported on mismatch.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn describe_options(&self) -> String {
        format!("one of {}", Value::Array(self.options.clone()))
    }
}

impl SchemaInfo for EnumSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Enum
    }
}

impl Validator for EnumSchema {
    type Output = Value;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Value, Issues> {
        match value {
            Some(actual) if self.options.iter().any(|o| same_value(o, actual)) => {
                Validation::Success(actual.clone())
            }
            _ => {
                let expected = self.describe_options();
                let message = self
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("expected {}", expected));
                Validation::Failure(Issues::single(
                    Issue::new(IssueCode::InvalidEnum, path.clone(), message)
                        .with_expected(expected)
                        .with_received_value(value),
                ))
            }
        }
    }

    fn output_to_value(&self, output: Value) -> Result<Option<Value>, String> {
        Ok(Some(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failure<S: Validator>(schema: &S, value: Option<&Value>) -> Issues
    where
        S::Output: std::fmt::Debug,
    {
        schema
            .validate(value, &JsonPath::root())
            .into_result()
            .unwrap_err()
    }

    #[test]
    fn test_literal_kinds() {
        assert!(LiteralSchema::new(true).validate(Some(&json!(true)), &JsonPath::root()).is_success());
        assert!(LiteralSchema::new(Value::Null)
            .validate(Some(&json!(null)), &JsonPath::root())
            .is_success());
        assert!(LiteralSchema::new(2)
            .validate(Some(&json!(2.0)), &JsonPath::root())
            .is_success());
    }

    #[test]
    fn test_literal_mismatch_details() {
        let errors = failure(&LiteralSchema::new("on"), Some(&json!("off")));
        let issue = errors.first();
        assert_eq!(issue.code, IssueCode::InvalidLiteral);
        assert_eq!(issue.message, r#"expected literal "on""#);
        assert_eq!(issue.received.as_deref(), Some("off"));
    }

    #[test]
    fn test_literal_rejects_absent() {
        let errors = failure(&LiteralSchema::new("on"), None);
        assert_eq!(errors.first().received.as_deref(), Some("undefined"));
    }

    #[test]
    fn test_enum_membership() {
        let schema = EnumSchema::new([json!(1), json!("one")]);
        assert!(schema.validate(Some(&json!(1)), &JsonPath::root()).is_success());
        assert!(schema.validate(Some(&json!("one")), &JsonPath::root()).is_success());

        let errors = failure(&schema, Some(&json!("two")));
        assert_eq!(errors.first().code, IssueCode::InvalidEnum);
    }

    #[test]
    fn test_custom_messages() {
        let errors = failure(&EnumSchema::new(["a"]).error("pick a"), Some(&json!("b")));
        assert_eq!(errors.first().message, "pick a");

        let errors = failure(&LiteralSchema::new(1).error("must be one"), Some(&json!(2)));
        assert_eq!(errors.first().message, "must be one");
    }
}
