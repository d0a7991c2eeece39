//! Union schema: the first matching member wins.

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, IssueCode, Issues};
use crate::path::JsonPath;

use super::traits::{SchemaInfo, SchemaKind, Validator, ValueValidator};

/// A schema accepting any value that one of its members accepts.
///
/// Members are tried in declaration order and the first success is returned.
/// When every member fails, the first member's issues are reported, each
/// message prefixed with `no union member matched`; codes and paths are kept.
///
/// # Example
///
/// ```rust
/// use vetter::{Schema, Validator, ValueValidator};
/// use serde_json::json;
///
/// let short_or_long = Schema::union(vec![
///     Box::new(Schema::string().min(5)) as Box<dyn ValueValidator>,
///     Box::new(Schema::string().max(3)) as Box<dyn ValueValidator>,
/// ]);
/// assert_eq!(short_or_long.parse(&json!("hi")).unwrap(), json!("hi"));
///
/// let id = Schema::union(Vec::new()).or(Schema::string().uuid()).or(Schema::number().integer());
/// assert!(id.parse(&json!(42)).is_ok());
/// assert!(id.parse(&json!(true)).is_err());
/// ```
#[derive(Clone, Default)]
pub struct UnionSchema {
    members: Vec<Arc<dyn ValueValidator>>,
}

impl UnionSchema {
    /// Creates a union of `members`, tried in the given order.
    pub fn new(members: Vec<Box<dyn ValueValidator>>) -> Self {
        Self {
            members: members.into_iter().map(Arc::from).collect(),
        }
    }

    /// Appends a member, tried after all existing ones.
    pub fn or<S>(mut self, member: S) -> Self
    where
        S: ValueValidator + 'static,
    {
        self.members.push(Arc::new(member));
        self
    }

    /// Returns the members in the order they are tried.
    pub fn members(&self) -> &[Arc<dyn ValueValidator>] {
        &self.members
    }
}

impl SchemaInfo for UnionSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Union
    }

    fn is_optional(&self) -> bool {
        self.members.iter().any(|m| m.is_optional())
    }

    fn collect_refs(&self, refs: &mut Vec<String>) {
        for member in &self.members {
            member.collect_refs(refs);
        }
    }
}

impl Validator for UnionSchema {
    /// The matching member's output rendered as JSON. A member that accepts
    /// an absent value yields `Null` here; inside objects the key is omitted.
    type Output = Value;

    fn validate(&self, value: Option<&Value>, path: &JsonPath) -> Validation<Value, Issues> {
        self.validate_to_value(value, path)
            .map(|rendered| rendered.unwrap_or(Value::Null))
    }

    fn output_to_value(&self, output: Value) -> Result<Option<Value>, String> {
        Ok(Some(output))
    }

    fn validate_to_value(
        &self,
        value: Option<&Value>,
        path: &JsonPath,
    ) -> Validation<Option<Value>, Issues> {
        let mut first_failure: Option<Issues> = None;

        for (index, member) in self.members.iter().enumerate() {
            match member.validate_value(value, path) {
                Validation::Success(rendered) => return Validation::Success(rendered),
                Validation::Failure(issues) => {
                    tracing::trace!(path = %path, member = index, "union member rejected value");
                    first_failure.get_or_insert(issues);
                }
            }
        }

        match first_failure {
            Some(issues) => Validation::Failure(
                issues.map_messages(|message| format!("no union member matched: {}", message)),
            ),
            None => Validation::Failure(Issues::single(
                Issue::new(
                    IssueCode::InvalidType,
                    path.clone(),
                    "no union member matched: union has no members",
                )
                .with_received_value(value),
            )),
        }
    }
}
