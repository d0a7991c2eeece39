//! Array schema validation.
//!
//! This module provides [`ArraySchema`] for validating arrays whose elements
//! all match one element schema, with array-level length constraints.

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueCode, Issues};
use crate::path::JsonPath;

use super::traits::{finish, type_failure, SchemaInfo, SchemaKind, Validator};

#[derive(Clone, Copy)]
enum LengthCheck {
    Min(usize),
    Max(usize),
    Exact(usize),
}

#[derive(Clone)]
struct ArrayConstraint {
    check: LengthCheck,
    message: Option<String>,
}

/// A schema for validating arrays.
///
/// Every element is validated, with its index appended to the path, and all
/// element issues are collected. Length constraints are applied only once
/// every element has passed.
///
/// # Example
///
/// ```rust
/// use vetter::{Schema, Validator};
/// use serde_json::json;
///
/// let tags = Schema::array(Schema::string().min(1)).nonempty().max(10);
///
/// assert_eq!(tags.parse(&json!(["a", "b"])).unwrap(), vec!["a", "b"]);
///
/// let error = tags.parse(&json!(["a", 123, "b"])).unwrap_err();
/// assert_eq!(error.field, "1");
/// ```
#[derive(Clone)]
pub struct ArraySchema<S> {
    element: S,
    constraints: Arc<Vec<ArrayConstraint>>,
    type_error_message: Option<String>,
}

impl<S: Validator> ArraySchema<S> {
    /// Creates a new array schema with the given element schema.
    pub fn new(element: S) -> Self {
        Self {
            element,
            constraints: Arc::new(Vec::new()),
            type_error_message: None,
        }
    }

    fn with_check(mut self, check: LengthCheck) -> Self {
        Arc::make_mut(&mut self.constraints).push(ArrayConstraint {
            check,
            message: None,
        });
        self
    }

    /// Requires at least `min` elements.
    pub fn min(self, min: usize) -> Self {
        self.with_check(LengthCheck::Min(min))
    }

    /// Requires at most `max` elements.
    pub fn max(self, max: usize) -> Self {
        self.with_check(LengthCheck::Max(max))
    }

    /// Requires exactly `len` elements.
    pub fn length(self, len: usize) -> Self {
        self.with_check(LengthCheck::Exact(len))
    }

    /// Requires at least one element.
    pub fn nonempty(self) -> Self {
        self.with_check(LengthCheck::Min(1))
    }

    /// Returns the element schema.
    pub fn element(&self) -> &S {
        &self.element
    }

    fn length_issues(&self, len: usize, path: &JsonPath) -> Vec<Issue> {
        self.constraints
            .iter()
            .filter_map(|c| check_length(c, len, path))
            .collect()
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error message
    /// (used when the value is not an array).
    ///
    /// ```rust
    /// use vetter::{Schema, Validator};
    /// use serde_json::json;
    ///
    /// let schema = Schema::array(Schema::string())
    ///     .min(1)
    ///     .error("at least one tag is required");
    ///
    /// let error = schema.parse(&json!([])).unwrap_err();
    /// assert_eq!(error.message, "at least one tag is required");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match Arc::make_mut(&mut self.constraints).last_mut() {
            Some(last) => last.message = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }
}

impl<S: Validator> SchemaInfo for ArraySchema<S> {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Array
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.element.collect_refs(refs);
    }
}

impl<S: Validator> Validator for ArraySchema<S> {
    type Output = Vec<S::Output>;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Self::Output, Issues> {
        let arr = match value {
            Some(Value::Array(arr)) => arr,
            _ => return type_failure(path, "array", value, self.type_error_message.as_deref()),
        };

        let mut items = Vec::with_capacity(arr.len());
        let mut issues = Vec::new();

        for (index, item) in arr.iter().enumerate() {
            match self.element.validate(Some(item), &path.push_index(index)) {
                Validation::Success(v) => items.push(v),
                Validation::Failure(e) => issues.extend(e),
            }
        }

        if issues.is_empty() {
            issues = self.length_issues(arr.len(), path);
        }

        finish(items, issues)
    }

    /// Renders each element as it is validated, so a rendering failure is
    /// reported at that element's index.
    fn validate_to_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        let arr = match value {
            Some(Value::Array(arr)) => arr,
            _ => return type_failure(path, "array", value, self.type_error_message.as_deref()),
        };

        let mut items = Vec::with_capacity(arr.len());
        let mut issues = Vec::new();

        for (index, item) in arr.iter().enumerate() {
            match self.element.validate_to_value(Some(item), &path.push_index(index)) {
                Validation::Success(v) => items.push(v.unwrap_or(Value::Null)),
                Validation::Failure(e) => issues.extend(e),
            }
        }

        if issues.is_empty() {
            issues = self.length_issues(arr.len(), path);
        }

        finish(Some(Value::Array(items)), issues)
    }

    fn output_to_value(&self, output: Self::Output) -> Result<Option<Value>, String> {
        output
            .into_iter()
            .map(|item| {
                self.element
                    .output_to_value(item)
                    .map(|v| v.unwrap_or(Value::Null))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|items| Some(Value::Array(items)))
    }
}

fn check_length(constraint: &ArrayConstraint, len: usize, path: &JsonPath) -> Option<Issue> {
    let (code, default_message, expected) = match constraint.check {
        LengthCheck::Min(min) if len < min => (
            IssueCode::TooShort,
            format!("must contain at least {} items, got {}", min, len),
            format!("at least {} items", min),
        ),
        LengthCheck::Max(max) if len > max => (
            IssueCode::TooLong,
            format!("must contain at most {} items, got {}", max, len),
            format!("at most {} items", max),
        ),
        LengthCheck::Exact(exact) if len != exact => (
            IssueCode::InvalidLength,
            format!("must contain exactly {} items, got {}", exact, len),
            format!("exactly {} items", exact),
        ),
        _ => return None,
    };

    let message = constraint.message.clone().unwrap_or(default_message);
    Some(
        Issue::new(code, path.clone(), message)
            .with_expected(expected)
            .with_received(format!("{} items", len)),
    )
}
