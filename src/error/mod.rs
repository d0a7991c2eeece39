//! Error types for validation failures.
//!
//! Validators accumulate [`Issue`]s internally as a non-empty [`Issues`]
//! collection. At the public boundary the collection is summarized into a
//! single [`ValidationError`] whose top-level fields mirror the first issue.

mod issue;
mod validation_error;

pub use issue::{describe_received, value_type_name, Issue, IssueCode, Issues};
pub use validation_error::{ValidationError, VALIDATION_ERROR};
