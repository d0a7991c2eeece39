//! Numeric schema validation.
//!
//! This module provides [`NumberSchema`] for validating numeric values with
//! bound, sign, integrality and finiteness constraints.

use serde_json::{Number, Value};
use std::ops::RangeInclusive;
use std::sync::Arc;
use stillwater::Validation;

use crate::error::{Issue, IssueCode, Issues};
use crate::path::JsonPath;

use super::traits::{finish, type_failure, SchemaInfo, SchemaKind, Validator};

#[derive(Clone, Copy)]
enum NumberCheck {
    Min(f64),
    Max(f64),
    Positive,
    Negative,
    NonNegative,
    NonPositive,
    Integer,
    Finite,
}

#[derive(Clone)]
struct NumberConstraint {
    check: NumberCheck,
    message: Option<String>,
}

/// A schema for validating numbers.
///
/// Any JSON number is accepted by the type check and parsed as `f64`. All
/// constraint violations are accumulated in declaration order.
///
/// Because the output is an `f64`, integers beyond ±2^53 lose precision:
/// `9007199254740993` parses and renders back as `9007199254740992`. Use a
/// string schema for identifiers that must survive exactly.
///
/// # Example
///
/// ```rust
/// use vetter::{IssueCode, Schema, Validator};
/// use serde_json::json;
///
/// let schema = Schema::number().integer().range(0..=100);
///
/// assert_eq!(schema.parse(&json!(42)).unwrap(), 42.0);
///
/// let error = schema.parse(&json!(150.5)).unwrap_err();
/// let codes: Vec<_> = error.issues.iter().map(|i| i.code).collect();
/// assert_eq!(codes, vec![IssueCode::NotInteger, IssueCode::TooBig]);
/// ```
#[derive(Clone, Default)]
pub struct NumberSchema {
    constraints: Arc<Vec<NumberConstraint>>,
    type_error_message: Option<String>,
}

impl NumberSchema {
    /// Creates a new number schema with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_check(mut self, check: NumberCheck) -> Self {
        Arc::make_mut(&mut self.constraints).push(NumberConstraint {
            check,
            message: None,
        });
        self
    }

    /// Requires the number to be at least `min` (inclusive).
    ///
    /// ```rust
    /// use vetter::{Schema, Validator};
    /// use serde_json::json;
    ///
    /// let adult = Schema::number().min(18);
    /// assert!(adult.parse(&json!(18)).is_ok());
    /// assert!(adult.parse(&json!(17.5)).is_err());
    /// ```
    pub fn min(self, min: impl Into<f64>) -> Self {
        self.with_check(NumberCheck::Min(min.into()))
    }

    /// Requires the number to be at most `max` (inclusive).
    pub fn max(self, max: impl Into<f64>) -> Self {
        self.with_check(NumberCheck::Max(max.into()))
    }

    /// Equivalent to `.min(start).max(end)`.
    pub fn range<T: Into<f64>>(self, range: RangeInclusive<T>) -> Self {
        let (start, end) = range.into_inner();
        self.min(start).max(end)
    }

    /// Requires the number to be strictly greater than zero.
    pub fn positive(self) -> Self {
        self.with_check(NumberCheck::Positive)
    }

    /// Requires the number to be strictly less than zero.
    pub fn negative(self) -> Self {
        self.with_check(NumberCheck::Negative)
    }

    /// Requires the number to be zero or greater (`TOO_SMALL`).
    pub fn nonnegative(self) -> Self {
        self.with_check(NumberCheck::NonNegative)
    }

    /// Requires the number to be zero or less (`TOO_BIG`).
    pub fn nonpositive(self) -> Self {
        self.with_check(NumberCheck::NonPositive)
    }

    /// Requires a whole number (`3` and `3.0` pass, `3.5` does not).
    pub fn integer(self) -> Self {
        self.with_check(NumberCheck::Integer)
    }

    /// Rejects infinities (`NOT_FINITE`).
    pub fn finite(self) -> Self {
        self.with_check(NumberCheck::Finite)
    }

    /// Sets a custom error message for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match Arc::make_mut(&mut self.constraints).last_mut() {
            Some(last) => last.message = Some(message.into()),
            None => self.type_error_message = Some(message.into()),
        }
        self
    }
}

impl SchemaInfo for NumberSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Number
    }
}

impl Validator for NumberSchema {
    type Output = f64;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<f64, Issues> {
        let n = match value.and_then(Value::as_f64) {
            Some(n) if !n.is_nan() => n,
            _ => return type_failure(path, "number", value, self.type_error_message.as_deref()),
        };

        let issues: Vec<Issue> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, n, path))
            .collect();

        finish(n, issues)
    }

    fn output_to_value(&self, output: f64) -> Result<Option<Value>, String> {
        number_to_value(output).map(Some)
    }
}

/// Renders a float as JSON, using an integer representation for whole values
/// so that `30` parses and renders back as `30` rather than `30.0`.
pub(crate) fn number_to_value(n: f64) -> Result<Value, String> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Ok(Value::from(n as i64));
    }
    Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| format!("{} is not representable as JSON", n))
}

/// Checks a single constraint and returns an issue if it fails.
fn check_constraint(constraint: &NumberConstraint, n: f64, path: &JsonPath) -> Option<Issue> {
    let (code, default_message, expected) = match constraint.check {
        NumberCheck::Min(min) if n < min => (
            IssueCode::TooSmall,
            format!("must be at least {}", min),
            format!(">= {}", min),
        ),
        NumberCheck::Max(max) if n > max => (
            IssueCode::TooBig,
            format!("must be at most {}", max),
            format!("<= {}", max),
        ),
        NumberCheck::Positive if n <= 0.0 => (
            IssueCode::NotPositive,
            "must be positive".to_string(),
            "> 0".to_string(),
        ),
        NumberCheck::Negative if n >= 0.0 => (
            IssueCode::NotNegative,
            "must be negative".to_string(),
            "< 0".to_string(),
        ),
        NumberCheck::NonNegative if n < 0.0 => (
            IssueCode::TooSmall,
            "must not be negative".to_string(),
            ">= 0".to_string(),
        ),
        NumberCheck::NonPositive if n > 0.0 => (
            IssueCode::TooBig,
            "must not be positive".to_string(),
            "<= 0".to_string(),
        ),
        NumberCheck::Integer if n.fract() != 0.0 => (
            IssueCode::NotInteger,
            "must be an integer".to_string(),
            "integer".to_string(),
        ),
        NumberCheck::Finite if !n.is_finite() => (
            IssueCode::NotFinite,
            "must be finite".to_string(),
            "finite number".to_string(),
        ),
        _ => return None,
    };

    let message = constraint.message.clone().unwrap_or(default_message);
    Some(
        Issue::new(code, path.clone(), message)
            .with_expected(expected)
            .with_received(n.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unwrap_success<T, E: std::fmt::Debug>(v: Validation<T, E>) -> T {
        v.into_result().unwrap()
    }

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    fn check(schema: &NumberSchema, value: Value) -> Validation<f64, Issues> {
        schema.validate(Some(&value), &JsonPath::root())
    }

    #[test]
    fn test_accepts_integers_and_floats() {
        let schema = NumberSchema::new();
        assert_eq!(unwrap_success(check(&schema, json!(42))), 42.0);
        assert_eq!(unwrap_success(check(&schema, json!(-1.5))), -1.5);
        assert_eq!(unwrap_success(check(&schema, json!(0))), 0.0);
    }

    #[test]
    fn test_rejects_non_number() {
        let schema = NumberSchema::new();
        for value in [json!("42"), json!(null), json!(true), json!([1]), json!({})] {
            let errors = unwrap_failure(check(&schema, value));
            assert_eq!(errors.first().code, IssueCode::InvalidType);
            assert_eq!(errors.first().expected.as_deref(), Some("number"));
        }

        let errors = unwrap_failure(check(&schema, json!("42")));
        assert_eq!(errors.first().received.as_deref(), Some("42"));
        assert_eq!(errors.first().message, "expected number, received string");
    }

    #[test]
    fn test_bounds() {
        let schema = NumberSchema::new().min(0).max(10);
        assert!(check(&schema, json!(0)).is_success());
        assert!(check(&schema, json!(10)).is_success());

        let errors = unwrap_failure(check(&schema, json!(-0.1)));
        assert_eq!(errors.first().code, IssueCode::TooSmall);
        assert_eq!(errors.first().message, "must be at least 0");

        let errors = unwrap_failure(check(&schema, json!(11)));
        assert_eq!(errors.first().code, IssueCode::TooBig);
    }

    #[test]
    fn test_impossible_range_reports_both_bounds() {
        let schema = NumberSchema::new().range(10..=5);
        let errors = unwrap_failure(check(&schema, json!(7)));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.with_code(IssueCode::TooSmall).len(), 1);
        assert_eq!(errors.with_code(IssueCode::TooBig).len(), 1);
    }

    #[test]
    fn test_sign_constraints() {
        let positive = NumberSchema::new().positive();
        assert!(check(&positive, json!(0.5)).is_success());
        let errors = unwrap_failure(check(&positive, json!(0)));
        assert_eq!(errors.first().code, IssueCode::NotPositive);

        let negative = NumberSchema::new().negative();
        assert!(check(&negative, json!(-3)).is_success());
        let errors = unwrap_failure(check(&negative, json!(0)));
        assert_eq!(errors.first().code, IssueCode::NotNegative);

        let nonnegative = NumberSchema::new().nonnegative();
        assert!(check(&nonnegative, json!(0)).is_success());
        assert!(check(&nonnegative, json!(-1)).is_failure());

        let nonpositive = NumberSchema::new().nonpositive();
        assert!(check(&nonpositive, json!(0)).is_success());
        assert!(check(&nonpositive, json!(1)).is_failure());
    }

    #[test]
    fn test_integer_constraint() {
        let schema = NumberSchema::new().integer();
        assert!(check(&schema, json!(3)).is_success());
        assert!(check(&schema, json!(3.0)).is_success());

        let errors = unwrap_failure(check(&schema, json!(3.5)));
        assert_eq!(errors.first().code, IssueCode::NotInteger);
        assert_eq!(errors.first().received.as_deref(), Some("3.5"));
    }

    #[test]
    fn test_finite_accepts_json_numbers() {
        let schema = NumberSchema::new().finite();
        assert!(check(&schema, json!(1e300)).is_success());
    }

    #[test]
    fn test_custom_messages() {
        let schema = NumberSchema::new().min(18).error("too young");
        let errors = unwrap_failure(check(&schema, json!(12)));
        assert_eq!(errors.first().message, "too young");

        let schema = NumberSchema::new().error("age must be a number");
        let errors = unwrap_failure(check(&schema, json!("12")));
        assert_eq!(errors.first().message, "age must be a number");
    }

    #[test]
    fn test_output_renders_whole_numbers_as_integers() {
        let schema = NumberSchema::new();
        assert_eq!(schema.output_to_value(30.0), Ok(Some(json!(30))));
        assert_eq!(schema.output_to_value(2.5), Ok(Some(json!(2.5))));
        assert!(schema.output_to_value(f64::INFINITY).is_err());
    }

    #[test]
    fn test_adding_constraint_leaves_clone_untouched() {
        let base = NumberSchema::new();
        let bounded = base.clone().max(1);

        assert!(check(&base, json!(5)).is_success());
        assert!(check(&bounded, json!(5)).is_failure());
    }
}
