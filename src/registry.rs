//! Schema registry for named schema storage and reference resolution.
//!
//! This module provides the [`SchemaRegistry`] type that stores named schemas
//! and resolves [`Schema::ref_`](crate::Schema::ref_) references during a parse.

use parking_lot::RwLock;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::outcome::Outcome;
use crate::path::JsonPath;
use crate::schema::ValueValidator;
use crate::validation::{RegistryAccess, ValidationContext};

/// Default limit on nested reference resolution.
pub const DEFAULT_MAX_DEPTH: usize = 100;

type SchemaMap = Arc<RwLock<HashMap<String, Arc<dyn ValueValidator>>>>;

/// A thread-safe registry of named schemas.
///
/// Clones share storage. Registration takes a write lock; parsing only reads,
/// so any number of threads may parse concurrently.
///
/// # Example
///
/// ```rust
/// use vetter::{IssueCode, Schema, SchemaRegistry, Validator};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry.register("Node", Schema::object()
///     .field("value", Schema::number())
///     .field("children", Schema::array(Schema::ref_("Node")).optional())
/// ).unwrap();
///
/// let tree = json!({"value": 1, "children": [{"value": 2}, {"value": "three"}]});
/// let error = registry.parse("Node", &tree).unwrap().unwrap_err();
/// assert_eq!(error.field, "children.1.value");
/// assert_eq!(error.first_issue().code, IssueCode::InvalidType);
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
    max_depth: usize,
}

impl SchemaRegistry {
    /// Creates a new empty registry with a max reference depth of 100.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum reference depth.
    ///
    /// A reference resolved at this depth fails with `MAX_DEPTH_EXCEEDED`.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns the reference depth limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Registers a schema under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    pub fn register<S>(&self, name: impl Into<String>, schema: S) -> Result<(), RegistryError>
    where
        S: ValueValidator + 'static,
    {
        let name = name.into();
        let mut schemas = self.schemas.write();

        if schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(schema = %name, kind = %schema.kind(), "registered schema");
        schemas.insert(name, Arc::new(schema));
        Ok(())
    }

    /// Retrieves a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ValueValidator>> {
        self.schemas.read().get(name).cloned()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the referenced names that are not registered, sorted and
    /// deduplicated.
    ///
    /// ```rust
    /// use vetter::{Schema, SchemaRegistry};
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("User", Schema::object()
    ///     .field("id", Schema::ref_("UserId"))
    /// ).unwrap();
    ///
    /// assert_eq!(registry.unresolved_refs(), vec!["UserId"]);
    /// ```
    pub fn unresolved_refs(&self) -> Vec<String> {
        let schemas = self.schemas.read();
        let mut refs = Vec::new();
        for schema in schemas.values() {
            schema.collect_refs(&mut refs);
        }

        let mut unresolved: Vec<String> = refs
            .into_iter()
            .filter(|name| !schemas.contains_key(name))
            .collect();
        unresolved.sort();
        unresolved.dedup();
        unresolved
    }

    /// Runs `f` with this registry resolving references on the current thread.
    ///
    /// This lets typed validators that contain references be parsed directly:
    ///
    /// ```rust
    /// use vetter::{Schema, SchemaRegistry, Validator};
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("Tag", Schema::string().min(1)).unwrap();
    ///
    /// let tags = Schema::array(Schema::ref_("Tag"));
    /// assert!(registry.enter(|| tags.parse(&json!(["a", "b"]))).is_ok());
    /// assert!(tags.parse(&json!(["a"])).is_err());
    /// ```
    pub fn enter<T>(&self, f: impl FnOnce() -> T) -> T {
        ValidationContext::new(Arc::new(self.clone()), self.max_depth).enter(f)
    }

    /// Parses `value` against the schema registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` if no schema has that name.
    /// Validation failures are reported in the inner [`Outcome`].
    pub fn parse(&self, name: &str, value: &Value) -> Result<Outcome<Value>, RegistryError> {
        let schema = self
            .get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))?;

        let result = self.enter(|| schema.validate_value(Some(value), &JsonPath::root()));
        Ok(result
            .into_result()
            .map(|rendered| rendered.unwrap_or(Value::Null))
            .map_err(|issues| {
                tracing::debug!(
                    schema = %name,
                    issues = issues.len(),
                    code = %issues.first().code,
                    "parse failed"
                );
                ValidationError::from_issues(issues)
            }))
    }

    /// Parses many values against one named schema in parallel, preserving
    /// input order.
    pub fn parse_batch(
        &self,
        name: &str,
        values: &[Value],
    ) -> Result<Vec<Outcome<Value>>, RegistryError> {
        if self.get(name).is_none() {
            return Err(RegistryError::SchemaNotFound(name.to_string()));
        }

        values.par_iter().map(|value| self.parse(name, value)).collect()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
            max_depth: self.max_depth,
        }
    }
}

impl RegistryAccess for SchemaRegistry {
    fn get_schema(&self, name: &str) -> Option<Arc<dyn ValueValidator>> {
        self.get(name)
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a schema with a name that already exists.
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to parse with a schema name that doesn't exist.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),
}
