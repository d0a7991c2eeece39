//! Modifier wrappers.
//!
//! Each modifier wraps a single inner validator and changes how absent or
//! null input is treated, or post-processes a successful output. Modifiers
//! are created through the provided methods on [`Validator`] (`optional`,
//! `nullable`, `with_default`, `transform`, `try_transform`, `refine`);
//! [`Required`] is applied by [`ObjectSchema::required`](crate::ObjectSchema::required).

use std::fmt::Display;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueCode, Issues};
use crate::outcome::from_try;
use crate::path::JsonPath;
use crate::schema::traits::{type_failure, SchemaInfo, SchemaKind, Validator};

/// Accepts an absent value; otherwise delegates.
///
/// ```rust
/// use vetter::{Schema, Validator};
/// use serde_json::json;
///
/// let nickname = Schema::string().min(2).optional();
///
/// assert_eq!(nickname.parse_input(None).unwrap(), None);
/// assert_eq!(nickname.parse(&json!("Al")).unwrap(), Some("Al".to_string()));
/// assert!(nickname.parse(&json!(null)).is_err());
/// ```
#[derive(Clone)]
pub struct Optional<S> {
    inner: S,
}

impl<S> Optional<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Validator> SchemaInfo for Optional<S> {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Optional
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs)
    }
}

impl<S: Validator> Validator for Optional<S> {
    type Output = Option<S::Output>;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Self::Output, Issues> {
        match value {
            None => Validation::Success(None),
            Some(_) => self.inner.validate(value, path).map(Some),
        }
    }

    fn output_to_value(&self, output: Self::Output) -> Result<Option<Value>, String> {
        match output {
            None => Ok(None),
            Some(inner) => self.inner.output_to_value(inner),
        }
    }

    fn validate_to_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        match value {
            None => Validation::Success(None),
            Some(_) => self.inner.validate_to_value(value, path),
        }
    }
}

/// Accepts `null`; otherwise delegates.
#[derive(Clone)]
pub struct Nullable<S> {
    inner: S,
}

impl<S> Nullable<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Validator> SchemaInfo for Nullable<S> {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Nullable
    }

    fn is_optional(&self) -> bool {
        self.inner.is_optional()
    }

    fn default_value(&self) -> Option<&Value> {
        self.inner.default_value()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs)
    }
}

impl<S: Validator> Validator for Nullable<S> {
    type Output = Option<S::Output>;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Self::Output, Issues> {
        match value {
            Some(Value::Null) => Validation::Success(None),
            _ => self.inner.validate(value, path).map(Some),
        }
    }

    fn output_to_value(&self, output: Self::Output) -> Result<Option<Value>, String> {
        match output {
            None => Ok(Some(Value::Null)),
            Some(inner) => self.inner.output_to_value(inner),
        }
    }

    fn validate_to_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        match value {
            Some(Value::Null) => Validation::Success(Some(Value::Null)),
            _ => self.inner.validate_to_value(value, path),
        }
    }
}

/// Substitutes a default for an absent value, then delegates.
///
/// The default passes through the inner validator like any other input:
///
/// ```rust
/// use vetter::{Schema, Validator};
///
/// assert_eq!(Schema::number().with_default(18).parse_input(None).unwrap(), 18.0);
/// assert!(Schema::number().min(21).with_default(18).parse_input(None).is_err());
/// ```
#[derive(Clone)]
pub struct WithDefault<S> {
    inner: S,
    default: Value,
}

impl<S> WithDefault<S> {
    pub(crate) fn new(inner: S, default: Value) -> Self {
        Self { inner, default }
    }
}

impl<S: Validator> SchemaInfo for WithDefault<S> {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Default
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn default_value(&self) -> Option<&Value> {
        Some(&self.default)
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs)
    }
}

impl<S: Validator> Validator for WithDefault<S> {
    type Output = S::Output;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Self::Output, Issues> {
        self.inner.validate(value.or(Some(&self.default)), path)
    }

    fn output_to_value(&self, output: Self::Output) -> Result<Option<Value>, String> {
        self.inner.output_to_value(output)
    }

    fn validate_to_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        self.inner.validate_to_value(value.or(Some(&self.default)), path)
    }
}

fn transformation_issue(path: &JsonPath, message: String) -> Issues {
    Issues::single(Issue::new(IssueCode::TransformationError, path.clone(), message))
}

fn render<U: Serialize>(output: U) -> Result<Option<Value>, String> {
    serde_json::to_value(output)
        .map(Some)
        .map_err(|e| format!("transformed value is not representable as JSON: {}", e))
}

/// Maps a successful output through a function.
///
/// ```rust
/// use vetter::{IssueCode, Schema, Validator};
/// use serde_json::json;
///
/// let words = Schema::string().transform(|s| s.split_whitespace().count());
/// assert_eq!(words.parse(&json!("a b c")).unwrap(), 3);
///
/// let broken = Schema::string().transform(|s| -> usize { s.parse().unwrap() });
/// let error = broken.parse(&json!("nope")).unwrap_err();
/// assert_eq!(error.first_issue().code, IssueCode::TransformationError);
/// ```
pub struct Transform<S, F, U> {
    inner: S,
    f: F,
    _output: PhantomData<fn() -> U>,
}

impl<S, F, U> Transform<S, F, U> {
    pub(crate) fn new(inner: S, f: F) -> Self {
        Self {
            inner,
            f,
            _output: PhantomData,
        }
    }
}

impl<S: Clone, F: Clone, U> Clone for Transform<S, F, U> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone(), self.f.clone())
    }
}

impl<S, F, U> SchemaInfo for Transform<S, F, U>
where
    S: Validator,
    F: Fn(S::Output) -> U + Send + Sync,
    U: Serialize,
{
    fn kind(&self) -> SchemaKind {
        SchemaKind::Transform
    }

    fn is_optional(&self) -> bool {
        self.inner.is_optional()
    }

    fn default_value(&self) -> Option<&Value> {
        self.inner.default_value()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs)
    }
}

impl<S, F, U> Validator for Transform<S, F, U>
where
    S: Validator,
    F: Fn(S::Output) -> U + Send + Sync,
    U: Serialize,
{
    type Output = U;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<U, Issues> {
        match self.inner.validate(value, path) {
            Validation::Success(output) => match from_try(|| (self.f)(output)) {
                Ok(mapped) => Validation::Success(mapped),
                Err(panic) => {
                    tracing::warn!(path = %path, panic = %panic, "transform panicked");
                    Validation::Failure(transformation_issue(
                        path,
                        format!("transformation failed: {}", panic),
                    ))
                }
            },
            Validation::Failure(issues) => Validation::Failure(issues),
        }
    }

    fn output_to_value(&self, output: U) -> Result<Option<Value>, String> {
        render(output)
    }
}

/// Maps a successful output through a fallible function.
///
/// ```rust
/// use vetter::{IssueCode, Schema, Validator};
/// use serde_json::json;
///
/// let port = Schema::string().try_transform(|s| s.parse::<u16>());
/// assert_eq!(port.parse(&json!("8080")).unwrap(), 8080);
///
/// let error = port.parse(&json!("99999")).unwrap_err();
/// assert_eq!(error.first_issue().code, IssueCode::TransformationError);
/// ```
pub struct TryTransform<S, F, U, E> {
    inner: S,
    f: F,
    _output: PhantomData<fn() -> (U, E)>,
}

impl<S, F, U, E> TryTransform<S, F, U, E> {
    pub(crate) fn new(inner: S, f: F) -> Self {
        Self {
            inner,
            f,
            _output: PhantomData,
        }
    }
}

impl<S: Clone, F: Clone, U, E> Clone for TryTransform<S, F, U, E> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone(), self.f.clone())
    }
}

impl<S, F, U, E> SchemaInfo for TryTransform<S, F, U, E>
where
    S: Validator,
    F: Fn(S::Output) -> Result<U, E> + Send + Sync,
    U: Serialize,
    E: Display,
{
    fn kind(&self) -> SchemaKind {
        SchemaKind::Transform
    }

    fn is_optional(&self) -> bool {
        self.inner.is_optional()
    }

    fn default_value(&self) -> Option<&Value> {
        self.inner.default_value()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs)
    }
}

impl<S, F, U, E> Validator for TryTransform<S, F, U, E>
where
    S: Validator,
    F: Fn(S::Output) -> Result<U, E> + Send + Sync,
    U: Serialize,
    E: Display,
{
    type Output = U;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<U, Issues> {
        match self.inner.validate(value, path) {
            Validation::Success(output) => match from_try(|| (self.f)(output)) {
                Ok(Ok(mapped)) => Validation::Success(mapped),
                Ok(Err(error)) => Validation::Failure(transformation_issue(path, error.to_string())),
                Err(panic) => {
                    tracing::warn!(path = %path, panic = %panic, "transform panicked");
                    Validation::Failure(transformation_issue(
                        path,
                        format!("transformation failed: {}", panic),
                    ))
                }
            },
            Validation::Failure(issues) => Validation::Failure(issues),
        }
    }

    fn output_to_value(&self, output: U) -> Result<Option<Value>, String> {
        render(output)
    }
}

/// Applies a predicate to a successful output.
///
/// ```rust
/// use vetter::{IssueCode, Schema, Validator};
/// use serde_json::json;
///
/// let even = Schema::number().integer().refine(|n| n % 2.0 == 0.0, "must be even");
///
/// assert!(even.parse(&json!(4)).is_ok());
/// let error = even.parse(&json!(3)).unwrap_err();
/// assert_eq!(error.message, "must be even");
/// assert_eq!(error.first_issue().code, IssueCode::CustomValidation);
/// ```
#[derive(Clone)]
pub struct Refine<S, P> {
    inner: S,
    predicate: P,
    message: String,
}

impl<S, P> Refine<S, P> {
    pub(crate) fn new(inner: S, predicate: P, message: String) -> Self {
        Self {
            inner,
            predicate,
            message,
        }
    }
}

impl<S, P> SchemaInfo for Refine<S, P>
where
    S: Validator,
    P: Fn(&S::Output) -> bool + Send + Sync,
{
    fn kind(&self) -> SchemaKind {
        SchemaKind::Refine
    }

    fn is_optional(&self) -> bool {
        self.inner.is_optional()
    }

    fn default_value(&self) -> Option<&Value> {
        self.inner.default_value()
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs)
    }
}

impl<S, P> Validator for Refine<S, P>
where
    S: Validator,
    P: Fn(&S::Output) -> bool + Send + Sync,
{
    type Output = S::Output;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Self::Output, Issues> {
        match self.inner.validate(value, path) {
            Validation::Success(output) if (self.predicate)(&output) => {
                Validation::Success(output)
            }
            Validation::Success(_) => Validation::Failure(Issues::single(
                Issue::new(IssueCode::CustomValidation, path.clone(), self.message.clone())
                    .with_received_value(value),
            )),
            Validation::Failure(issues) => Validation::Failure(issues),
        }
    }

    fn output_to_value(&self, output: Self::Output) -> Result<Option<Value>, String> {
        self.inner.output_to_value(output)
    }
}

/// Rejects an absent value even when the inner validator would accept it.
#[derive(Clone)]
pub struct Required<S> {
    inner: S,
}

impl<S> Required<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Validator> SchemaInfo for Required<S> {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Required
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        self.inner.collect_refs(refs)
    }
}

impl<S: Validator> Validator for Required<S> {
    type Output = S::Output;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Self::Output, Issues> {
        match value {
            None => type_failure(path, "value", None, Some("required")),
            Some(_) => self.inner.validate(value, path),
        }
    }

    fn output_to_value(&self, output: Self::Output) -> Result<Option<Value>, String> {
        self.inner.output_to_value(output)
    }

    fn validate_to_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        match value {
            None => type_failure(path, "value", None, Some("required")),
            Some(_) => self.inner.validate_to_value(value, path),
        }
    }
}
