//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! length, format and pattern constraints, plus post-validation normalizers.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueCode, Issues};
use crate::path::JsonPath;
use crate::schema::traits::{finish, type_failure, SchemaInfo, SchemaKind, Validator};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s/$.?#][^\s]*$").expect("url pattern compiles")
});

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

#[derive(Clone)]
enum StringCheck {
    Min(usize),
    Max(usize),
    Length(usize),
    Email,
    Url,
    Uuid,
    Pattern { regex: Regex, source: String },
    StartsWith(String),
    EndsWith(String),
}

/// A check plus its optional custom message.
#[derive(Clone)]
struct StringConstraint {
    check: StringCheck,
    message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Normalize {
    Trim,
    Lowercase,
    Uppercase,
}

/// A schema for validating string values.
///
/// Constraints are checked in declaration order against the raw input and
/// every violation is reported. Normalizers (`trim`, `lowercase`,
/// `uppercase`) run afterwards, in declaration order, on a valid string.
///
/// # Example
///
/// ```rust
/// use vetter::{IssueCode, Schema, Validator};
/// use serde_json::json;
///
/// let schema = Schema::string().min(3).max(20).regex(r"^[a-z]+$").unwrap();
///
/// let error = schema.parse(&json!("AB")).unwrap_err();
/// assert_eq!(error.issues.len(), 2);
/// assert_eq!(error.first_issue().code, IssueCode::TooShort);
/// ```
#[derive(Clone, Default)]
pub struct StringSchema {
    constraints: Arc<Vec<StringConstraint>>,
    normalizers: Arc<Vec<Normalize>>,
    type_error_message: Option<String>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_check(mut self, check: StringCheck) -> Self {
        Arc::make_mut(&mut self.constraints).push(StringConstraint {
            check,
            message: None,
        });
        self
    }

    fn with_normalizer(mut self, normalize: Normalize) -> Self {
        Arc::make_mut(&mut self.normalizers).push(normalize);
        self
    }

    /// Requires at least `min` characters (Unicode scalar values).
    pub fn min(self, min: usize) -> Self {
        self.with_check(StringCheck::Min(min))
    }

    /// Requires at most `max` characters.
    pub fn max(self, max: usize) -> Self {
        self.with_check(StringCheck::Max(max))
    }

    /// Requires exactly `len` characters.
    pub fn length(self, len: usize) -> Self {
        self.with_check(StringCheck::Length(len))
    }

    /// Requires at least one character.
    pub fn nonempty(self) -> Self {
        self.with_check(StringCheck::Min(1))
    }

    /// Requires an email address of the form `local@domain.tld`.
    pub fn email(self) -> Self {
        self.with_check(StringCheck::Email)
    }

    /// Requires an absolute URL with a scheme (e.g. `https://example.com`).
    pub fn url(self) -> Self {
        self.with_check(StringCheck::Url)
    }

    /// Requires a hyphenated UUID.
    pub fn uuid(self) -> Self {
        self.with_check(StringCheck::Uuid)
    }

    /// Requires the string to match `pattern`.
    ///
    /// Returns an error if the pattern does not compile.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vetter::{Schema, Validator};
    /// use serde_json::json;
    ///
    /// let zip = Schema::string().regex(r"^\d{5}$").unwrap();
    /// assert!(zip.parse(&json!("12345")).is_ok());
    /// assert!(zip.parse(&json!("1234a")).is_err());
    /// ```
    pub fn regex(self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(self.with_check(StringCheck::Pattern {
            regex,
            source: pattern.to_string(),
        }))
    }

    /// Requires the string to begin with `prefix` (`INVALID_PATTERN`).
    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.with_check(StringCheck::StartsWith(prefix.into()))
    }

    /// Requires the string to end with `suffix` (`INVALID_PATTERN`).
    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.with_check(StringCheck::EndsWith(suffix.into()))
    }

    /// Trims surrounding whitespace from the parsed value.
    pub fn trim(self) -> Self {
        self.with_normalizer(Normalize::Trim)
    }

    /// Lowercases the parsed value. Constraints still see the raw input.
    pub fn lowercase(self) -> Self {
        self.with_normalizer(Normalize::Lowercase)
    }

    /// Uppercases the parsed value. Constraints still see the raw input.
    pub fn uppercase(self) -> Self {
        self.with_normalizer(Normalize::Uppercase)
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error message
    /// (used when the value is not a string).
    ///
    /// # Example
    ///
    /// ```rust
    /// use vetter::{Schema, Validator};
    /// use serde_json::json;
    ///
    /// let schema = Schema::string()
    ///     .min(5)
    ///     .error("username must be at least 5 characters");
    ///
    /// let error = schema.parse(&json!("hi")).unwrap_err();
    /// assert_eq!(error.message, "username must be at least 5 characters");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match Arc::make_mut(&mut self.constraints).last_mut() {
            Some(last) => last.message = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }

    fn normalize(&self, value: &str) -> String {
        self.normalizers
            .iter()
            .fold(value.to_string(), |s, normalize| match normalize {
                Normalize::Trim => s.trim().to_string(),
                Normalize::Lowercase => s.to_lowercase(),
                Normalize::Uppercase => s.to_uppercase(),
            })
    }
}

impl SchemaInfo for StringSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::String
    }
}

impl Validator for StringSchema {
    type Output = String;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<String, Issues> {
        let s = match value.and_then(Value::as_str) {
            Some(s) => s,
            None => {
                return type_failure(path, "string", value, self.type_error_message.as_deref())
            }
        };

        let issues: Vec<Issue> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, s, path))
            .collect();

        finish(self.normalize(s), issues)
    }

    fn output_to_value(&self, output: String) -> Result<Option<Value>, String> {
        Ok(Some(Value::String(output)))
    }
}

/// Checks a single constraint and returns an issue if it fails.
fn check_constraint(constraint: &StringConstraint, value: &str, path: &JsonPath) -> Option<Issue> {
    let len = value.chars().count();
    let (code, default_message, expected) = match &constraint.check {
        StringCheck::Min(min) if len < *min => (
            IssueCode::TooShort,
            format!("must be at least {} characters, got {}", min, len),
            format!("at least {} characters", min),
        ),
        StringCheck::Max(max) if len > *max => (
            IssueCode::TooLong,
            format!("must be at most {} characters, got {}", max, len),
            format!("at most {} characters", max),
        ),
        StringCheck::Length(exact) if len != *exact => (
            IssueCode::InvalidLength,
            format!("must be exactly {} characters, got {}", exact, len),
            format!("exactly {} characters", exact),
        ),
        StringCheck::Email if !EMAIL_REGEX.is_match(value) => (
            IssueCode::InvalidEmail,
            "invalid email address".to_string(),
            "email address".to_string(),
        ),
        StringCheck::Url if !URL_REGEX.is_match(value) => (
            IssueCode::InvalidUrl,
            "invalid url".to_string(),
            "url".to_string(),
        ),
        StringCheck::Uuid if !UUID_REGEX.is_match(value) => (
            IssueCode::InvalidUuid,
            "invalid uuid".to_string(),
            "uuid".to_string(),
        ),
        StringCheck::Pattern { regex, source } if !regex.is_match(value) => (
            IssueCode::InvalidPattern,
            format!("must match pattern '{}'", source),
            format!("string matching '{}'", source),
        ),
        StringCheck::StartsWith(prefix) if !value.starts_with(prefix.as_str()) => (
            IssueCode::InvalidPattern,
            format!("must start with '{}'", prefix),
            format!("string starting with '{}'", prefix),
        ),
        StringCheck::EndsWith(suffix) if !value.ends_with(suffix.as_str()) => (
            IssueCode::InvalidPattern,
            format!("must end with '{}'", suffix),
            format!("string ending with '{}'", suffix),
        ),
        _ => return None,
    };

    let message = constraint.message.clone().unwrap_or(default_message);
    Some(
        Issue::new(code, path.clone(), message)
            .with_expected(expected)
            .with_received(value),
    )
}
