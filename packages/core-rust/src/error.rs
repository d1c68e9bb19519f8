//! Failures that escape a wrapped invocation.

/// A failure raised by one of the two unguarded hooks.
///
/// The wrapper funnels operation, `before`, and `after` failures into
/// [`WrappedResult::Failure`](crate::WrappedResult::Failure). `on_error` and
/// `finally` have no second layer of protection: their failures surface here
/// and replace whatever outcome the invocation had computed.
#[derive(Debug, thiserror::Error)]
pub enum HookFailure {
    /// `on_error` failed while observing an operation failure.
    #[error("on_error hook failed: {0}")]
    OnError(#[source] anyhow::Error),
    /// `finally` failed; supersedes any result or earlier `OnError`.
    #[error("finally hook failed: {0}")]
    Finally(#[source] anyhow::Error),
}

impl HookFailure {
    /// The error exactly as the hook returned it.
    #[must_use]
    pub fn into_inner(self) -> anyhow::Error {
        match self {
            Self::OnError(err) | Self::Finally(err) => err,
        }
    }

    /// Borrow the hook's error, e.g. to `downcast_ref` it.
    #[must_use]
    pub fn inner(&self) -> &anyhow::Error {
        match self {
            Self::OnError(err) | Self::Finally(err) => err,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
