//! The lifecycle wrapper: runs an operation between its hooks and normalizes
//! the outcome.
//!
//! Per invocation, strictly in sequence:
//!
//! 1. `before(&args)`
//! 2. `operation(args)`
//! 3. `after(&result)` on success
//! 4. `Success(result)`, or on any failure in 1-3:
//!    `on_error(&error)` then `Failure(error)`
//! 5. `finally()` on every path, including an `on_error` failure
//!
//! Steps 1-3 share one failure scope. `on_error` and `finally` are not
//! guarded; their failures escape as [`HookFailure`].

use std::future::{ready, Future, Ready};
use std::sync::Arc;

use tracing::{debug, debug_span, warn, Instrument};

use crate::config::WrapConfig;
use crate::error::HookFailure;
use crate::hooks::LifecycleHooks;
use crate::result::WrappedResult;

/// What one invocation resolves to. The outer `Err` is an escaped hook
/// failure; operation failures are inside the `WrappedResult`.
pub type Invocation<T, E> = Result<WrappedResult<T, E>, HookFailure>;

// ---------------------------------------------------------------------------
// invoke
// ---------------------------------------------------------------------------

/// Run a single invocation of `operation` with `args` between `hooks`.
///
/// No work happens until the returned future is polled.
///
/// # Errors
///
/// Returns [`HookFailure::OnError`] if `on_error` fails and
/// [`HookFailure::Finally`] if `finally` fails. `finally` still runs after an
/// `on_error` failure, and its own failure takes precedence.
pub async fn invoke<A, T, E, F, Fut>(
    hooks: &LifecycleHooks<A, T, E>,
    config: &WrapConfig,
    args: A,
    operation: F,
) -> Invocation<T, E>
where
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let span = debug_span!(
        "lifecycle",
        op = config.name,
        outcome = tracing::field::Empty,
    );

    async move {
        let outcome = observe(hooks, config, args, operation).await;

        let released = match &hooks.finally {
            Some(finally) => {
                debug!("finally hook");
                let pending = finally();
                pending.await.map_err(HookFailure::Finally)
            }
            None => Ok(()),
        };

        // A failed release replaces whatever the invocation produced.
        let outcome = released.and(outcome);
        let label = match &outcome {
            Ok(WrappedResult::Success(_)) => "ok",
            Ok(WrappedResult::Failure(_)) => "error",
            Err(_) => "escaped",
        };
        tracing::Span::current().record("outcome", label);
        outcome
    }
    .instrument(span)
    .await
}

/// Steps 1-6: the guarded attempt plus `on_error` observation.
async fn observe<A, T, E, F, Fut>(
    hooks: &LifecycleHooks<A, T, E>,
    config: &WrapConfig,
    args: A,
    operation: F,
) -> Invocation<T, E>
where
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match attempt(hooks, args, operation).await {
        Ok(result) => Ok(WrappedResult::Success(result)),
        Err(error) => {
            if config.log_failures {
                warn!(op = config.name, "operation failed");
            }
            if let Some(on_error) = &hooks.on_error {
                debug!("on_error hook");
                let pending = on_error(&error);
                pending.await.map_err(HookFailure::OnError)?;
            }
            Ok(WrappedResult::Failure(error))
        }
    }
}

/// Steps 1-3 under one failure scope.
async fn attempt<A, T, E, F, Fut>(
    hooks: &LifecycleHooks<A, T, E>,
    args: A,
    operation: F,
) -> Result<T, E>
where
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(before) = &hooks.before {
        debug!("before hook");
        let pending = before(&args);
        pending.await?;
    }

    let result = operation(args).await?;

    if let Some(after) = &hooks.after {
        debug!("after hook");
        let pending = after(&result);
        pending.await?;
    }

    Ok(result)
}

// ---------------------------------------------------------------------------
// Wrapped
// ---------------------------------------------------------------------------

/// An operation bound to its hooks. Reusable and cheap to clone; calls share
/// no mutable state, so concurrent calls are independent.
pub struct Wrapped<F, A, T, E> {
    operation: F,
    hooks: Arc<LifecycleHooks<A, T, E>>,
    config: Arc<WrapConfig>,
}

/// Bind an async `operation` to `hooks`.
///
/// Multi-argument operations take a tuple; zero-argument ones take `()`.
pub fn wrap<F, Fut, A, T, E>(operation: F, hooks: LifecycleHooks<A, T, E>) -> Wrapped<F, A, T, E>
where
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Wrapped {
        operation,
        hooks: Arc::new(hooks),
        config: Arc::new(WrapConfig::default()),
    }
}

/// Bind a synchronous `operation` to `hooks`. It runs inside the same
/// lifecycle as an already-completed future.
pub fn wrap_sync<F, A, T, E>(
    operation: F,
    hooks: LifecycleHooks<A, T, E>,
) -> Wrapped<impl Fn(A) -> Ready<Result<T, E>>, A, T, E>
where
    F: Fn(A) -> Result<T, E>,
{
    wrap(move |args| ready(operation(args)), hooks)
}

impl<F, A, T, E> Wrapped<F, A, T, E> {
    /// Replace the span label and failure logging settings.
    #[must_use]
    pub fn with_config(mut self, config: WrapConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    #[must_use]
    pub fn hooks(&self) -> &LifecycleHooks<A, T, E> {
        &self.hooks
    }

    #[must_use]
    pub fn config(&self) -> &WrapConfig {
        &self.config
    }
}

impl<F, Fut, A, T, E> Wrapped<F, A, T, E>
where
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    /// Invoke the wrapped operation. See [`invoke`] for the sequence.
    ///
    /// # Errors
    ///
    /// Only when `on_error` or `finally` fail; operation failures resolve to
    /// `Ok(WrappedResult::Failure(..))`.
    pub async fn call(&self, args: A) -> Invocation<T, E> {
        invoke(&self.hooks, &self.config, args, &self.operation).await
    }
}

impl<F: Clone, A, T, E> Clone for Wrapped<F, A, T, E> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation.clone(),
            hooks: Arc::clone(&self.hooks),
            config: Arc::clone(&self.config),
        }
    }
}

impl<F, A, T, E> std::fmt::Debug for Wrapped<F, A, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wrapped")
            .field("hooks", &self.hooks)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
