//! Pipeline composition: puts the lifecycle layer in front of a service and
//! erases the resulting type.

use hookwrap_core::{HookFailure, LifecycleHooks, WrapConfig, WrappedResult};
use tower::util::BoxCloneService;
use tower::{Service, ServiceBuilder};

use crate::layer::LifecycleLayer;

/// Type-erased service produced by [`build_lifecycle_pipeline`].
pub type LifecyclePipeline<A, T, E> = BoxCloneService<A, WrappedResult<T, E>, HookFailure>;

/// Wrap `service` with `hooks` and return a cloneable, type-erased handle.
///
/// Every call resolves to a `WrappedResult`; the service error is
/// `HookFailure`, raised only by `on_error` or `finally`.
#[must_use]
pub fn build_lifecycle_pipeline<S, A, T, E>(
    service: S,
    hooks: LifecycleHooks<A, T, E>,
    config: WrapConfig,
) -> LifecyclePipeline<A, T, E>
where
    S: Service<A, Response = T, Error = E> + Clone + Send + 'static,
    S::Future: Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    BoxCloneService::new(
        ServiceBuilder::new()
            .layer(LifecycleLayer::new(hooks).with_config(config))
            .service(service),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::future::{ready, Ready};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tower::util::ServiceFn;
    use tower::{service_fn, ServiceExt};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct NotFound(String);

    fn lookup_service(
    ) -> ServiceFn<impl FnMut(String) -> Ready<Result<usize, NotFound>> + Clone + Send> {
        service_fn(|key: String| {
            ready(if key.is_empty() {
                Err(NotFound(key))
            } else {
                Ok(key.len())
            })
        })
    }

    #[tokio::test]
    async fn pipeline_routes_through_lifecycle_layer() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&finished);
        let hooks = LifecycleHooks::<String, usize, NotFound>::new().finally(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ready(Ok(()))
        });

        let pipeline =
            build_lifecycle_pipeline(lookup_service(), hooks, WrapConfig::named("lookup"));

        let found = pipeline.clone().oneshot("abc".to_string()).await.unwrap();
        let missing = pipeline.oneshot(String::new()).await.unwrap();

        assert_eq!(found, WrappedResult::Success(3));
        assert_eq!(missing, WrappedResult::Failure(NotFound(String::new())));
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_calls_resolve_independently() {
        let pipeline = build_lifecycle_pipeline(
            lookup_service(),
            LifecycleHooks::<String, usize, NotFound>::new(),
            WrapConfig::default(),
        );

        let (a, b) = tokio::join!(
            pipeline.clone().oneshot("one".to_string()),
            pipeline.clone().oneshot("three".to_string()),
        );
        assert_eq!(a.unwrap(), WrappedResult::Success(3));
        assert_eq!(b.unwrap(), WrappedResult::Success(5));
    }
}
