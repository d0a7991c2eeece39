//! The success/failure outcome returned at the parse boundary.
//!
//! An [`Outcome`] is a plain `Result`: `is_ok`/`is_err`, `map`, `and_then`,
//! `map_err`, `unwrap`, `unwrap_or` and `unwrap_or_else` all come from the
//! standard library. This module adds the pieces `Result` lacks: a two-branch
//! [`fold`](OutcomeExt::fold), conversion of panicking code into an outcome
//! ([`from_try`], [`from_future`]), and the flattened [`SafeParseResult`].

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

use crate::error::ValidationError;

/// Result of a parse: the typed value, or a [`ValidationError`].
pub type Outcome<T, E = ValidationError> = Result<T, E>;

/// Extra combinators for [`Outcome`].
pub trait OutcomeExt<T, E> {
    /// Dispatches to exactly one of the two branches and returns its result.
    ///
    /// ```rust
    /// use vetter::{OutcomeExt, Schema, Validator};
    /// use serde_json::json;
    ///
    /// let label = Schema::string()
    ///     .min(5)
    ///     .parse(&json!("hi"))
    ///     .fold(|s| format!("ok: {}", s), |e| format!("error at '{}'", e.field));
    /// assert_eq!(label, "error at ''");
    /// ```
    fn fold<R>(self, on_ok: impl FnOnce(T) -> R, on_err: impl FnOnce(E) -> R) -> R;
}

impl<T, E> OutcomeExt<T, E> for Result<T, E> {
    fn fold<R>(self, on_ok: impl FnOnce(T) -> R, on_err: impl FnOnce(E) -> R) -> R {
        match self {
            Ok(value) => on_ok(value),
            Err(error) => on_err(error),
        }
    }
}

/// Runs `f`, converting a panic into `Err` carrying the panic message.
///
/// The panic hook still runs before the panic is caught.
///
/// ```rust
/// use vetter::outcome::from_try;
///
/// assert_eq!(from_try(|| 2 + 2), Ok(4));
/// ```
pub fn from_try<T>(f: impl FnOnce() -> T) -> Outcome<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

/// Awaits `future`, converting a panic while polling into `Err` carrying the
/// panic message.
pub async fn from_future<F>(future: F) -> Outcome<F::Output, String>
where
    F: Future,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Flattened form of an [`Outcome`]: `{ success, data, error }`.
///
/// Exactly one of `data` and `error` is populated, as indicated by `success`.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeParseResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ValidationError>,
}

impl<T> From<Outcome<T>> for SafeParseResult<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(error) => Self {
                success: false,
                data: None,
                error: Some(error),
            },
        }
    }
}
