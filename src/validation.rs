//! Validation context for schema reference resolution.
//!
//! A [`ValidationContext`] carries the registry that references resolve
//! against and the current reference depth. The registry installs a context
//! for the duration of a parse; [`RefSchema`](crate::schema::RefSchema) reads
//! it back and runs the referenced schema one level deeper. Contexts are kept
//! per thread, so validators themselves stay free of shared mutable state.

use std::cell::RefCell;
use std::sync::Arc;

use crate::schema::ValueValidator;

/// Lookup of named schemas.
pub trait RegistryAccess: Send + Sync {
    fn get_schema(&self, name: &str) -> Option<Arc<dyn ValueValidator>>;
}

/// The registry and reference depth of the parse running on this thread.
#[derive(Clone)]
pub struct ValidationContext {
    registry: Arc<dyn RegistryAccess>,
    depth: usize,
    max_depth: usize,
}

impl ValidationContext {
    /// Creates a top-level context resolving names through `registry`.
    pub fn new(registry: Arc<dyn RegistryAccess>, max_depth: usize) -> Self {
        Self {
            registry,
            depth: 0,
            max_depth,
        }
    }

    /// Returns a context one reference level deeper.
    pub fn increment_depth(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            depth: self.depth + 1,
            max_depth: self.max_depth,
        }
    }

    /// Number of reference links followed to reach the current schema.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Depth at which a further reference fails with `MAX_DEPTH_EXCEEDED`.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The registry references resolve against.
    pub fn registry(&self) -> &dyn RegistryAccess {
        &*self.registry
    }

    /// Runs `f` with this context active on the current thread.
    ///
    /// The previously active context is restored when `f` returns or unwinds.
    pub fn enter<T>(self, f: impl FnOnce() -> T) -> T {
        let _guard = ContextGuard::push(self);
        f()
    }

    /// Returns the context active on the current thread, if any.
    pub fn current() -> Option<Self> {
        ACTIVE.with(|stack| stack.borrow().last().cloned())
    }
}

thread_local! {
    static ACTIVE: RefCell<Vec<ValidationContext>> = const { RefCell::new(Vec::new()) };
}

struct ContextGuard;

impl ContextGuard {
    fn push(context: ValidationContext) -> Self {
        ACTIVE.with(|stack| stack.borrow_mut().push(context));
        ContextGuard
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
