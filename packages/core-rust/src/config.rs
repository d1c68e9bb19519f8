/// Per-wrapper settings for the invocation span and failure logging.
///
/// Never changes the execution order or the result shape.
#[derive(Debug, Clone)]
pub struct WrapConfig {
    /// Label recorded as the `op` field of each invocation's tracing span.
    pub name: &'static str,
    /// Emit a `warn` event when the operation path fails.
    pub log_failures: bool,
}

impl WrapConfig {
    /// Default config with the given span label.
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            name: "operation",
            log_failures: true,
        }
    }
}
