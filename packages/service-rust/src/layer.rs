//! Lifecycle middleware for tower services.
//!
//! Runs `before`/`after`/`on_error`/`finally` around the inner service and
//! resolves every call to a `WrappedResult`.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use hookwrap_core::{invoke, HookFailure, Invocation, LifecycleHooks, WrapConfig, WrappedResult};
use tower::{Layer, Service, ServiceExt};

// ---------------------------------------------------------------------------
// LifecycleLayer
// ---------------------------------------------------------------------------

/// Tower layer that binds a shared hook set to every service it wraps.
pub struct LifecycleLayer<A, T, E> {
    hooks: Arc<LifecycleHooks<A, T, E>>,
    config: Arc<WrapConfig>,
}

impl<A, T, E> LifecycleLayer<A, T, E> {
    /// Create a layer with the default `WrapConfig`.
    #[must_use]
    pub fn new(hooks: LifecycleHooks<A, T, E>) -> Self {
        Self {
            hooks: Arc::new(hooks),
            config: Arc::new(WrapConfig::default()),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: WrapConfig) -> Self {
        self.config = Arc::new(config);
        self
    }
}

impl<S, A, T, E> Layer<S> for LifecycleLayer<A, T, E> {
    type Service = LifecycleService<S, A, T, E>;

    fn layer(&self, inner: S) -> Self::Service {
        tracing::debug!(op = self.config.name, hooks = ?self.hooks, "lifecycle layer attached");
        LifecycleService {
            inner,
            hooks: Arc::clone(&self.hooks),
            config: Arc::clone(&self.config),
        }
    }
}

impl<A, T, E> Clone for LifecycleLayer<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            hooks: Arc::clone(&self.hooks),
            config: Arc::clone(&self.config),
        }
    }
}

impl<A, T, E> fmt::Debug for LifecycleLayer<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleLayer")
            .field("hooks", &self.hooks)
            .field("config", &self.config)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// LifecycleService
// ---------------------------------------------------------------------------

/// Service wrapper produced by [`LifecycleLayer`].
///
/// Always ready. Each call clones the inner service and drives it to
/// readiness only after `before` has run, so a readiness error is reported
/// as `WrappedResult::Failure` like any other operation failure.
pub struct LifecycleService<S, A, T, E> {
    inner: S,
    hooks: Arc<LifecycleHooks<A, T, E>>,
    config: Arc<WrapConfig>,
}

impl<S, A, T, E> Service<A> for LifecycleService<S, A, T, E>
where
    S: Service<A, Response = T, Error = E> + Clone + Send + 'static,
    S::Future: Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Response = WrappedResult<T, E>;
    type Error = HookFailure;
    type Future = Pin<Box<dyn Future<Output = Invocation<T, E>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, args: A) -> Self::Future {
        let inner = self.inner.clone();
        let hooks = Arc::clone(&self.hooks);
        let config = Arc::clone(&self.config);
        Box::pin(async move { invoke(&hooks, &config, args, move |args| inner.oneshot(args)).await })
    }
}

impl<S: Clone, A, T, E> Clone for LifecycleService<S, A, T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            hooks: Arc::clone(&self.hooks),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: fmt::Debug, A, T, E> fmt::Debug for LifecycleService<S, A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleService")
            .field("inner", &self.inner)
            .field("hooks", &self.hooks)
            .field("config", &self.config)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
