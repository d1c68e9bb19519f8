//! Lifecycle hook slots shared by every invocation of a wrapped operation.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

// ---------------------------------------------------------------------------
// Boxed hook types
// ---------------------------------------------------------------------------

/// Runs before the operation with a borrow of the call's arguments.
pub type BeforeHook<A, E> = Arc<dyn Fn(&A) -> BoxFuture<'static, Result<(), E>> + Send + Sync>;

/// Runs after a successful operation with a borrow of its result.
pub type AfterHook<T, E> = Arc<dyn Fn(&T) -> BoxFuture<'static, Result<(), E>> + Send + Sync>;

/// Observes the captured failure. Its own failure is not caught.
pub type ErrorHook<E> =
    Arc<dyn Fn(&E) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Runs last on every path. Its own failure supersedes the outcome.
pub type FinallyHook = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

// ---------------------------------------------------------------------------
// LifecycleHooks
// ---------------------------------------------------------------------------

/// Four independent, optional callbacks around an operation taking `A` and
/// producing `Result<T, E>`.
///
/// Hooks receive a borrow and return an owned future, so anything the async
/// part needs must be copied out of the argument first:
///
/// ```
/// use hookwrap_core::LifecycleHooks;
///
/// let hooks = LifecycleHooks::<(u32, u32), u32, String>::new()
///     .before(|&(a, b): &(u32, u32)| async move {
///         tracing::debug!(a, b, "dividing");
///         Ok(())
///     })
///     .finally(|| std::future::ready(Ok(())));
/// assert!(hooks.has_before());
/// ```
///
/// A synchronous hook returns an already-completed future such as
/// [`std::future::ready`]. The execution order is fixed by
/// [`invoke`](crate::invoke); nothing here configures it.
pub struct LifecycleHooks<A, T, E> {
    pub(crate) before: Option<BeforeHook<A, E>>,
    pub(crate) after: Option<AfterHook<T, E>>,
    pub(crate) on_error: Option<ErrorHook<E>>,
    pub(crate) finally: Option<FinallyHook>,
}

impl<A, T, E> LifecycleHooks<A, T, E> {
    /// Empty hook set: the wrapper only normalizes the outcome.
    #[must_use]
    pub fn new() -> Self {
        Self {
            before: None,
            after: None,
            on_error: None,
            finally: None,
        }
    }

    #[must_use]
    pub fn has_before(&self) -> bool {
        self.before.is_some()
    }

    #[must_use]
    pub fn has_after(&self) -> bool {
        self.after.is_some()
    }

    #[must_use]
    pub fn has_on_error(&self) -> bool {
        self.on_error.is_some()
    }

    #[must_use]
    pub fn has_finally(&self) -> bool {
        self.finally.is_some()
    }
}

impl<A: 'static, T: 'static, E: 'static> LifecycleHooks<A, T, E> {
    /// Set the `before` slot. A failure here skips the operation and is
    /// reported as `Failure`.
    #[must_use]
    pub fn before<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        let hook: BeforeHook<A, E> = Arc::new(move |args: &A| hook(args).boxed());
        self.before = Some(hook);
        self
    }

    /// Set the `after` slot. Its return value is discarded; a failure turns
    /// the outcome into `Failure`.
    #[must_use]
    pub fn after<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        let hook: AfterHook<T, E> = Arc::new(move |result: &T| hook(result).boxed());
        self.after = Some(hook);
        self
    }

    /// Set the `on_error` slot.
    #[must_use]
    pub fn on_error<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(&E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let hook: ErrorHook<E> = Arc::new(move |error: &E| hook(error).boxed());
        self.on_error = Some(hook);
        self
    }

    /// Set the `finally` slot.
    #[must_use]
    pub fn finally<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let hook: FinallyHook = Arc::new(move || hook().boxed());
        self.finally = Some(hook);
        self
    }
}

impl<A, T, E> Default for LifecycleHooks<A, T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T, E> Clone for LifecycleHooks<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            before: self.before.clone(),
            after: self.after.clone(),
            on_error: self.on_error.clone(),
            finally: self.finally.clone(),
        }
    }
}

impl<A, T, E> fmt::Debug for LifecycleHooks<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("before", &self.has_before())
            .field("after", &self.has_after())
            .field("on_error", &self.has_on_error())
            .field("finally", &self.has_finally())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
