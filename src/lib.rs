//! # Vetter
//!
//! Declarative schemas for validating and parsing untrusted JSON values.
//!
//! ## Overview
//!
//! A schema is built once from composable pieces (strings, numbers, objects,
//! arrays, unions, references and more) and then used to parse any number of
//! inputs. Parsing either yields the validated, possibly transformed, value or
//! a [`ValidationError`] listing every problem found, each with a stable
//! [`IssueCode`] and the [`JsonPath`] where it occurred. Validation is
//! accumulating: sibling fields and array elements are all checked even after
//! one of them fails, using stillwater's `Validation` type.
//!
//! ## Core Types
//!
//! - [`Schema`]: Entry point for creating schemas
//! - [`Validator`]: Parsing and the modifiers shared by every schema
//! - [`Issue`] / [`Issues`]: A single problem, and a non-empty collection of them
//! - [`ValidationError`]: The error returned by a failed parse
//! - [`SchemaRegistry`]: Named schemas and the references between them
//!
//! ## Example
//!
//! ```rust
//! use vetter::{IssueCode, Schema, Validator};
//! use serde_json::json;
//!
//! let signup = Schema::object()
//!     .field("email", Schema::string().email().lowercase())
//!     .field("age", Schema::number().integer().min(13))
//!     .strict();
//!
//! let user = signup.parse(&json!({"email": "Ann@Example.com", "age": 30})).unwrap();
//! assert_eq!(user["email"], json!("ann@example.com"));
//!
//! let error = signup.parse(&json!({"email": "nope", "age": 12.5})).unwrap_err();
//! assert_eq!(error.issues.len(), 3);
//! assert_eq!(error.field, "email");
//! assert_eq!(error.first_issue().code, IssueCode::InvalidEmail);
//! ```

pub mod error;
pub mod outcome;
pub mod path;
pub mod registry;
pub mod schema;
pub mod validation;

pub use error::{Issue, IssueCode, Issues, ValidationError, VALIDATION_ERROR};
pub use outcome::{from_future, from_try, Outcome, OutcomeExt, SafeParseResult};
pub use path::{JsonPath, PathSegment};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{
    ArraySchema, BooleanSchema, EnumSchema, LiteralSchema, Nullable, NumberSchema, ObjectSchema,
    Optional, RecordSchema, RefSchema, Refine, Required, Schema, SchemaInfo, SchemaKind,
    StringSchema, Transform, TryTransform, UnionSchema, UnknownKeys, Validator, ValueValidator,
    WithDefault,
};
pub use validation::{RegistryAccess, ValidationContext};

/// Accumulating validation result used by every schema.
pub type ValidationResult<T> = stillwater::Validation<T, Issues>;
