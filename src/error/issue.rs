//! Issue types: single validation failures and their non-empty collection.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;

use crate::path::JsonPath;

/// Machine-readable classification of a single validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// The value has the wrong runtime kind (or is absent/null where not allowed).
    InvalidType,
    /// String or array shorter than its minimum.
    TooShort,
    /// String or array longer than its maximum.
    TooLong,
    /// String or array length differs from the exact length required.
    InvalidLength,
    InvalidEmail,
    InvalidUrl,
    InvalidUuid,
    /// String does not match a pattern constraint.
    InvalidPattern,
    /// Number below its minimum.
    TooSmall,
    /// Number above its maximum.
    TooBig,
    NotPositive,
    NotNegative,
    NotInteger,
    NotFinite,
    InvalidLiteral,
    InvalidEnum,
    /// A `refine` predicate rejected the value.
    CustomValidation,
    /// A transform failed to produce a value.
    TransformationError,
    /// A strict object received a key it does not declare.
    UnrecognizedKeys,
    /// A schema reference could not be resolved.
    UnresolvedReference,
    /// A chain of schema references exceeded the registry's depth limit.
    MaxDepthExceeded,
}

impl IssueCode {
    /// Returns the wire name of the code (e.g. `TOO_SHORT`).
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::InvalidType => "INVALID_TYPE",
            IssueCode::TooShort => "TOO_SHORT",
            IssueCode::TooLong => "TOO_LONG",
            IssueCode::InvalidLength => "INVALID_LENGTH",
            IssueCode::InvalidEmail => "INVALID_EMAIL",
            IssueCode::InvalidUrl => "INVALID_URL",
            IssueCode::InvalidUuid => "INVALID_UUID",
            IssueCode::InvalidPattern => "INVALID_PATTERN",
            IssueCode::TooSmall => "TOO_SMALL",
            IssueCode::TooBig => "TOO_BIG",
            IssueCode::NotPositive => "NOT_POSITIVE",
            IssueCode::NotNegative => "NOT_NEGATIVE",
            IssueCode::NotInteger => "NOT_INTEGER",
            IssueCode::NotFinite => "NOT_FINITE",
            IssueCode::InvalidLiteral => "INVALID_LITERAL",
            IssueCode::InvalidEnum => "INVALID_ENUM",
            IssueCode::CustomValidation => "CUSTOM_VALIDATION",
            IssueCode::TransformationError => "TRANSFORMATION_ERROR",
            IssueCode::UnrecognizedKeys => "UNRECOGNIZED_KEYS",
            IssueCode::UnresolvedReference => "UNRESOLVED_REFERENCE",
            IssueCode::MaxDepthExceeded => "MAX_DEPTH_EXCEEDED",
        }
    }
}

impl Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic validation failure.
///
/// An `Issue` records where the failure happened, what kind of failure it was,
/// and optionally what was expected and what was received.
///
/// # Example
///
/// ```rust
/// use vetter::{Issue, IssueCode, JsonPath};
/// use serde_json::json;
///
/// let issue = Issue::new(
///     IssueCode::InvalidEmail,
///     JsonPath::root().push_field("email"),
///     "invalid email address",
/// )
/// .with_expected("email address")
/// .with_received_value(Some(&json!("not-an-email")));
///
/// assert_eq!(issue.received.as_deref(), Some("not-an-email"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Structural location of the failing value.
    pub path: JsonPath,
    /// Human-readable description of the failure.
    pub message: String,
    pub code: IssueCode,
    /// Description of what was expected instead.
    pub expected: Option<String>,
    /// Representation of the value that was received.
    pub received: Option<String>,
}

impl Issue {
    /// Creates an issue with the given code, path and message.
    pub fn new(code: IssueCode, path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            code,
            expected: None,
            received: None,
        }
    }

    /// Sets the "expected" description.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Sets the "received" description verbatim.
    pub fn with_received(mut self, received: impl Into<String>) -> Self {
        self.received = Some(received.into());
        self
    }

    /// Derives the "received" description from the offending value.
    ///
    /// See [`describe_received`] for the representation used.
    pub fn with_received_value(self, value: Option<&Value>) -> Self {
        self.with_received(describe_received(value))
    }

    /// Builds the `INVALID_TYPE` issue every validator reports when the input
    /// has the wrong runtime kind.
    ///
    /// `message` overrides the default `expected X, received Y` wording.
    pub fn type_mismatch(
        path: &JsonPath,
        expected: &str,
        value: Option<&Value>,
        message: Option<&str>,
    ) -> Self {
        let message = message.map(str::to_string).unwrap_or_else(|| {
            format!("expected {}, received {}", expected, value_type_name(value))
        });
        Issue::new(IssueCode::InvalidType, path.clone(), message)
            .with_expected(expected)
            .with_received_value(value)
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {} [{}]", path_str, self.message, self.code)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref received) = self.received {
            write!(f, " (received: {})", received)?;
        }

        Ok(())
    }
}

impl std::error::Error for Issue {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Issue>();
    assert_sync::<Issue>();
};

/// A non-empty collection of issues.
///
/// `Issues` wraps a `NonEmptyVec<Issue>` so a failed validation can never be
/// constructed without at least one issue. It implements `Semigroup`, which is
/// how composite validators concatenate the issues of their children.
///
/// ```rust
/// use vetter::{Issue, IssueCode, Issues, JsonPath};
/// use stillwater::prelude::*;
///
/// let name = Issues::single(Issue::new(
///     IssueCode::InvalidType,
///     JsonPath::root().push_field("name"),
///     "expected string, received undefined",
/// ));
/// let age = Issues::single(Issue::new(
///     IssueCode::TooSmall,
///     JsonPath::root().push_field("age"),
///     "must be at least 18",
/// ));
///
/// assert_eq!(name.combine(age).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Issues(NonEmptyVec<Issue>);

impl Issues {
    /// Creates a collection containing a single issue.
    pub fn single(issue: Issue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Creates a collection from a vec, or `None` if the vec is empty.
    ///
    /// Composite validators gather child issues into a plain vec and use this
    /// to decide between success and failure.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        NonEmptyVec::from_vec(issues).map(Self)
    }

    /// Returns the number of issues.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: the collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the issues.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    /// Returns the first issue.
    pub fn first(&self) -> &Issue {
        self.0.head()
    }

    /// Returns all issues at exactly the given path.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&Issue> {
        self.0.iter().filter(|i| &i.path == path).collect()
    }

    /// Returns all issues with the given code.
    pub fn with_code(&self, code: IssueCode) -> Vec<&Issue> {
        self.0.iter().filter(|i| i.code == code).collect()
    }

    /// Converts the collection into a `Vec<Issue>`.
    pub fn into_vec(self) -> Vec<Issue> {
        self.0.into_vec()
    }

    /// Rewrites every issue's message, keeping paths and codes intact.
    pub fn map_messages<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let fallback = Issues::single(self.first().clone());
        let rewritten: Vec<Issue> = self
            .into_vec()
            .into_iter()
            .map(|mut issue| {
                issue.message = f(&issue.message);
                issue
            })
            .collect();
        Issues::from_vec(rewritten).unwrap_or(fallback)
    }
}

impl Semigroup for Issues {
    fn combine(self, other: Self) -> Self {
        Issues(self.0.combine(other.0))
    }
}

impl Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "validation failed with {} issue(s):", self.len())?;
        for (i, issue) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = Box<dyn Iterator<Item = &'a Issue> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Issues>();
    assert_sync::<Issues>();
};

/// Returns the runtime kind name of an input value; `undefined` when absent.
pub fn value_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Returns the "received" representation of an input value.
///
/// Objects and arrays are stringified as JSON, strings are reported verbatim,
/// and every other value uses its literal representation (`42`, `true`,
/// `null`). An absent value is reported as `undefined`.
pub fn describe_received(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
