//! Traits for validator polymorphism.
//!
//! [`Validator`] is implemented by every schema type and carries the typed
//! output of a successful parse. [`ValueValidator`] is its object-safe,
//! type-erased view, used wherever heterogeneous validators are stored
//! together (object fields, union members, the registry).

use std::fmt::{self, Display};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueCode, Issues, ValidationError};
use crate::outcome::{Outcome, SafeParseResult};
use crate::path::JsonPath;
use crate::schema::modifiers::{Nullable, Optional, Refine, Transform, TryTransform, WithDefault};
use crate::validation::ValidationContext;

/// Type tag reported by [`SchemaInfo::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Record,
    Union,
    Literal,
    Enum,
    Optional,
    Nullable,
    Default,
    Transform,
    Refine,
    Required,
    Ref,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Object => "object",
            SchemaKind::Array => "array",
            SchemaKind::Record => "record",
            SchemaKind::Union => "union",
            SchemaKind::Literal => "literal",
            SchemaKind::Enum => "enum",
            SchemaKind::Optional => "optional",
            SchemaKind::Nullable => "nullable",
            SchemaKind::Default => "default",
            SchemaKind::Transform => "transform",
            SchemaKind::Refine => "refine",
            SchemaKind::Required => "required",
            SchemaKind::Ref => "ref",
        }
    }
}

impl Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Introspection shared by typed and type-erased validators.
pub trait SchemaInfo: Send + Sync {
    /// Returns the type tag of this validator.
    fn kind(&self) -> SchemaKind;

    /// Whether an absent value is accepted.
    fn is_optional(&self) -> bool {
        false
    }

    /// The value substituted when the input is absent, if any.
    fn default_value(&self) -> Option<&Value> {
        None
    }

    /// Appends the names of all schema references reachable from this validator.
    fn collect_refs(&self, _refs: &mut Vec<String>) {}
}

/// A validator that parses untrusted JSON input into a typed value.
///
/// Implementors provide [`validate`](Validator::validate), which accumulates
/// every issue found, and [`output_to_value`](Validator::output_to_value),
/// which renders the typed output back into JSON so the validator can be
/// nested inside composites. Everything else is provided.
///
/// Validators are immutable: builder and modifier methods consume `self` and
/// return a new value, and `validate` never mutates anything.
///
/// # Example
///
/// ```rust
/// use vetter::{Schema, SchemaInfo, Validator};
/// use serde_json::json;
///
/// let age = Schema::number().integer().min(0.0);
///
/// assert_eq!(age.parse(&json!(30)).unwrap(), 30.0);
/// assert!(age.parse(&json!(-1)).is_err());
/// assert_eq!(age.kind().as_str(), "number");
/// ```
pub trait Validator: SchemaInfo {
    /// The value produced by a successful parse.
    type Output;

    /// Validates `value` located at `path`.
    ///
    /// `None` is the absent value (a missing object key). Failures carry every
    /// issue found, with paths rooted at `path`.
    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Self::Output, Issues>;

    /// Renders a successful output as JSON.
    ///
    /// `Ok(None)` means the value is absent and an enclosing object omits the
    /// key. `Err` carries the message of a rendering failure.
    fn output_to_value(&self, output: Self::Output) -> Result<Option<Value>, String>;

    /// Validates and renders the output as JSON in one step.
    fn validate_to_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        match self.validate(value, path) {
            Validation::Success(output) => match self.output_to_value(output) {
                Ok(rendered) => Validation::Success(rendered),
                Err(message) => Validation::Failure(Issues::single(Issue::new(
                    IssueCode::TransformationError,
                    path.clone(),
                    message,
                ))),
            },
            Validation::Failure(issues) => Validation::Failure(issues),
        }
    }

    /// Parses a present input value.
    fn parse(&self, input: &Value) -> Outcome<Self::Output> {
        self.parse_input(Some(input))
    }

    /// Parses an input that may be absent.
    ///
    /// ```rust
    /// use vetter::{Schema, Validator};
    ///
    /// let schema = Schema::number().with_default(18);
    /// assert_eq!(schema.parse_input(None).unwrap(), 18.0);
    /// ```
    fn parse_input(&self, input: Option<&Value>) -> Outcome<Self::Output> {
        self.validate(input, &JsonPath::root())
            .into_result()
            .map_err(|issues| {
                tracing::debug!(
                    kind = %self.kind(),
                    issues = issues.len(),
                    code = %issues.first().code,
                    "parse failed"
                );
                ValidationError::from_issues(issues)
            })
    }

    /// Parses `input` into the flattened `{ success, data, error }` form.
    fn safe_parse(&self, input: &Value) -> SafeParseResult<Self::Output> {
        self.parse(input).into()
    }

    /// Parses many inputs in parallel, preserving input order.
    ///
    /// The reference context active on the calling thread, if any, is
    /// re-entered on each worker, so schema references resolve the same way
    /// they do for [`parse`](Self::parse).
    fn parse_batch(&self, inputs: &[Value]) -> Vec<Outcome<Self::Output>>
    where
        Self::Output: Send,
    {
        let context = ValidationContext::current();
        inputs
            .par_iter()
            .map(|input| match &context {
                Some(context) => context.clone().enter(|| self.parse(input)),
                None => self.parse(input),
            })
            .collect()
    }

    /// Accepts an absent input, producing `None`.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional::new(self)
    }

    /// Accepts a `null` input, producing `None`.
    fn nullable(self) -> Nullable<Self>
    where
        Self: Sized,
    {
        Nullable::new(self)
    }

    /// Substitutes `value` for an absent input. The default is still validated.
    fn with_default(self, value: impl Into<Value>) -> WithDefault<Self>
    where
        Self: Sized,
    {
        WithDefault::new(self, value.into())
    }

    /// Maps a successful output through `f`.
    ///
    /// A panic inside `f` is reported as a `TRANSFORMATION_ERROR` issue. The
    /// panic still runs the process panic hook, which prints to stderr by
    /// default, so expected failures belong in
    /// [`try_transform`](Self::try_transform).
    fn transform<F, U>(self, f: F) -> Transform<Self, F, U>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U + Send + Sync,
        U: Serialize,
    {
        Transform::new(self, f)
    }

    /// Maps a successful output through a fallible `f`; `Err` becomes a
    /// `TRANSFORMATION_ERROR` issue carrying the error's message.
    fn try_transform<F, U, E>(self, f: F) -> TryTransform<Self, F, U, E>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Result<U, E> + Send + Sync,
        U: Serialize,
        E: Display,
    {
        TryTransform::new(self, f)
    }

    /// Rejects a successful output for which `predicate` is false, with a
    /// `CUSTOM_VALIDATION` issue carrying `message`.
    fn refine<P>(self, predicate: P, message: impl Into<String>) -> Refine<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Output) -> bool + Send + Sync,
    {
        Refine::new(self, predicate, message.into())
    }
}

/// A type-erased validator producing JSON.
///
/// Every [`Validator`] is a `ValueValidator`, so any schema can be stored as
/// `Box<dyn ValueValidator>` or `Arc<dyn ValueValidator>`.
///
/// ```rust
/// use vetter::{Schema, SchemaInfo, ValueValidator};
///
/// let members: Vec<Box<dyn ValueValidator>> = vec![
///     Box::new(Schema::string().min(1)),
///     Box::new(Schema::number().positive()),
/// ];
/// assert_eq!(members[1].kind().as_str(), "number");
/// ```
pub trait ValueValidator: SchemaInfo {
    /// Validates `value` and renders the result as JSON; `None` means absent.
    fn validate_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues>;
}

impl<S: Validator> ValueValidator for S {
    fn validate_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        self.validate_to_value(value, path)
    }
}

/// A shared erased validator is itself a validator whose output is the
/// rendered JSON, which lets composites wrap stored fields in modifiers.
impl SchemaInfo for Arc<dyn ValueValidator> {
    fn kind(&self) -> SchemaKind {
        (**self).kind()
    }

    fn is_optional(&self) -> bool {
        (**self).is_optional()
    }

    fn default_value(&self) -> Option<&Value> {
        (**self).default_value()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        (**self).collect_refs(refs)
    }
}

impl Validator for Arc<dyn ValueValidator> {
    type Output = Option<Value>;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Option<Value>, Issues> {
        (**self).validate_value(value, path)
    }

    fn output_to_value(&self, output: Option<Value>) -> Result<Option<Value>, String> {
        Ok(output)
    }
}

/// Builds the failure for an input of the wrong runtime kind.
pub(crate) fn type_failure<T>(
    path: &JsonPath,
    expected: &str,
    value: Option<&Value>,
    message: Option<&str>,
) -> Validation<T, Issues> {
    Validation::Failure(Issues::single(Issue::type_mismatch(
        path, expected, value, message,
    )))
}

/// Turns a list of collected issues into a validation result.
pub(crate) fn finish<T>(output: T, issues: Vec<Issue>) -> Validation<T, Issues> {
    match Issues::from_vec(issues) {
        Some(issues) => Validation::Failure(issues),
        None => Validation::Success(output),
    }
}
