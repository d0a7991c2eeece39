//! Schema definitions for validation.
//!
//! Each schema type validates one kind of JSON value and accumulates every
//! issue it finds rather than stopping at the first. Schemas are immutable:
//! builder methods return a new schema and leave the receiver untouched, so a
//! schema can be shared freely across threads once built.
//!
//! # Example
//!
//! ```rust
//! use vetter::{Schema, Validator};
//! use serde_json::json;
//!
//! let name = Schema::string().min(1).max(100);
//!
//! assert_eq!(name.parse(&json!("hello")).unwrap(), "hello");
//! assert!(name.parse(&json!("")).is_err());
//! ```

mod array;
mod boolean;
mod literal;
mod modifiers;
mod numeric;
mod object;
mod record;
mod ref_schema;
mod string;
mod traits;
mod union;

pub use array::ArraySchema;
pub use boolean::BooleanSchema;
pub use literal::{EnumSchema, LiteralSchema};
pub use modifiers::{Nullable, Optional, Refine, Required, Transform, TryTransform, WithDefault};
pub use numeric::NumberSchema;
pub use object::{ObjectSchema, UnknownKeys};
pub use record::RecordSchema;
pub use ref_schema::RefSchema;
pub use string::StringSchema;
pub use traits::{SchemaInfo, SchemaKind, Validator, ValueValidator};
pub use union::UnionSchema;

use serde_json::Value;

/// Entry point for creating validation schemas.
///
/// `Schema` provides factory methods for each schema type. Constraints are
/// added through builder methods on the returned schema, and wrappers such as
/// [`optional`](Validator::optional) or [`transform`](Validator::transform)
/// come from the [`Validator`] trait.
///
/// # Example
///
/// ```rust
/// use vetter::{Schema, Validator};
/// use serde_json::json;
///
/// let user = Schema::object()
///     .field("name", Schema::string().min(1))
///     .field("age", Schema::number().integer().nonnegative())
///     .field("email", Schema::string().email().optional())
///     .field("role", Schema::enum_(["admin", "user"]).with_default("user"));
///
/// let parsed = user.parse(&json!({"name": "Alice", "age": 30})).unwrap();
/// assert_eq!(parsed["role"], json!("user"));
/// assert!(!parsed.contains_key("email"));
/// ```
pub struct Schema;

impl Schema {
    /// Creates a string schema.
    ///
    /// ```rust
    /// use vetter::{Schema, Validator};
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().min(5);
    /// assert!(schema.parse(&json!("hello")).is_ok());
    /// assert!(schema.parse(&json!("hi")).is_err());
    /// ```
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a number schema. Integers and floats are both accepted unless
    /// [`integer`](NumberSchema::integer) is added.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a schema accepting `true` or `false`.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates an object schema with no declared fields.
    ///
    /// Unknown keys are ignored by default; see [`UnknownKeys`].
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates an array schema whose elements all satisfy `element`.
    pub fn array<S: Validator>(element: S) -> ArraySchema<S> {
        ArraySchema::new(element)
    }

    /// Creates a schema for objects with arbitrary keys whose values all
    /// satisfy `values`.
    pub fn record<S: Validator>(values: S) -> RecordSchema<S> {
        RecordSchema::new(values)
    }

    /// Creates a union tried in member order.
    pub fn union(members: Vec<Box<dyn ValueValidator>>) -> UnionSchema {
        UnionSchema::new(members)
    }

    /// Creates a schema accepting exactly `value`.
    pub fn literal(value: impl Into<Value>) -> LiteralSchema {
        LiteralSchema::new(value)
    }

    /// Creates a schema accepting any of `options`.
    pub fn enum_<I, V>(options: I) -> EnumSchema
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        EnumSchema::new(options)
    }

    /// Creates a reference to a schema registered under `name`.
    ///
    /// References resolve only while a [`SchemaRegistry`](crate::SchemaRegistry)
    /// is running the parse.
    pub fn ref_(name: impl Into<String>) -> RefSchema {
        RefSchema::new(name)
    }
}
