//! The boundary error returned by `parse`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::issue::{Issue, IssueCode, Issues};
use crate::path::JsonPath;

/// The only top-level code a [`ValidationError`] ever carries.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// A failed parse, summarizing every accumulated issue.
///
/// The top-level `message`, `field`, `field_path`, `expected` and `actual`
/// mirror the first issue; the full taxonomy lives in `issues[].code`.
///
/// # Example
///
/// ```rust
/// use vetter::{IssueCode, Schema, Validator};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string())
///     .field("age", Schema::number());
///
/// let error = schema.parse(&json!({"name": "John"})).unwrap_err();
/// assert_eq!(error.code, "VALIDATION_ERROR");
/// assert_eq!(error.field, "age");
/// assert_eq!(error.first_issue().code, IssueCode::InvalidType);
/// ```
#[derive(Debug, Clone, thiserror::Error)]
#[error("{issues}")]
pub struct ValidationError {
    /// Always [`VALIDATION_ERROR`].
    pub code: &'static str,
    /// Message of the first issue.
    pub message: String,
    /// Dotted path of the first issue (e.g. `items.2.name`).
    pub field: String,
    /// Path segments of the first issue.
    pub field_path: JsonPath,
    pub expected: Option<String>,
    /// The received representation of the first issue's value.
    pub actual: Option<String>,
    pub issues: Issues,
    /// When the error was created.
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied context (request id, form name, ...).
    pub context: Map<String, Value>,
}

impl ValidationError {
    /// Builds the summary error from a non-empty issue collection.
    pub fn from_issues(issues: Issues) -> Self {
        let first = issues.first();
        Self {
            code: VALIDATION_ERROR,
            message: first.message.clone(),
            field: first.path.to_dotted(),
            field_path: first.path.clone(),
            expected: first.expected.clone(),
            actual: first.received.clone(),
            timestamp: Utc::now(),
            context: Map::new(),
            issues,
        }
    }

    /// Attaches a context entry and returns self for chaining.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Returns the first issue, which the summary fields mirror.
    pub fn first_issue(&self) -> &Issue {
        self.issues.first()
    }

    /// Returns all issues at exactly the given path.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&Issue> {
        self.issues.at_path(path)
    }

    /// Returns all issues with the given code.
    pub fn with_code(&self, code: IssueCode) -> Vec<&Issue> {
        self.issues.with_code(code)
    }
}

impl From<Issues> for ValidationError {
    fn from(issues: Issues) -> Self {
        Self::from_issues(issues)
    }
}

// Two parses of the same input are equal even though their timestamps differ.
impl PartialEq for ValidationError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
            && self.message == other.message
            && self.field == other.field
            && self.field_path == other.field_path
            && self.expected == other.expected
            && self.actual == other.actual
            && self.issues == other.issues
            && self.context == other.context
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stillwater::prelude::*;

    fn sample_issues() -> Issues {
        Issues::single(
            Issue::new(
                IssueCode::InvalidType,
                JsonPath::root().push_field("items").push_index(2).push_field("name"),
                "expected string, received number",
            )
            .with_expected("string")
            .with_received("7"),
        )
        .combine(Issues::single(Issue::new(
            IssueCode::TooShort,
            JsonPath::root().push_field("title"),
            "too short",
        )))
    }

    #[test]
    fn test_summary_mirrors_first_issue() {
        let error = ValidationError::from_issues(sample_issues());

        assert_eq!(error.code, VALIDATION_ERROR);
        assert_eq!(error.message, "expected string, received number");
        assert_eq!(error.field, "items.2.name");
        assert_eq!(error.field_path.to_string(), "items[2].name");
        assert_eq!(error.expected.as_deref(), Some("string"));
        assert_eq!(error.actual.as_deref(), Some("7"));
        assert_eq!(error.issues.len(), 2);
    }

    #[test]
    fn test_equality_ignores_timestamp() {
        let a = ValidationError::from_issues(sample_issues());
        let mut b = ValidationError::from_issues(sample_issues());
        b.timestamp = a.timestamp + chrono::Duration::seconds(5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_context_participates_in_equality() {
        let a = ValidationError::from_issues(sample_issues());
        let b = ValidationError::from_issues(sample_issues()).with_context("form", json!("signup"));
        assert_ne!(a, b);
        assert_eq!(b.context.get("form"), Some(&json!("signup")));
    }

    #[test]
    fn test_display_lists_issues() {
        let error = ValidationError::from_issues(sample_issues());
        let display = error.to_string();
        assert!(display.contains("2 issue(s)"));
        assert!(display.contains("items[2].name"));
        assert!(display.contains("title: too short"));
    }

    #[test]
    fn test_queries() {
        let error = ValidationError::from_issues(sample_issues());
        assert_eq!(error.with_code(IssueCode::TooShort).len(), 1);
        assert_eq!(
            error
                .at_path(&JsonPath::from_segments(["title"]))
                .first()
                .map(|i| i.code),
            Some(IssueCode::TooShort)
        );
    }
}
