//! `hookwrap` Core — lifecycle hooks around fallible async operations and the
//! tagged result they resolve to.

pub mod config;
pub mod error;
pub mod hooks;
pub mod result;
pub mod wrap;

pub use config::WrapConfig;
pub use error::HookFailure;
pub use hooks::{AfterHook, BeforeHook, ErrorHook, FinallyHook, LifecycleHooks};
pub use result::WrappedResult;
pub use wrap::{invoke, wrap, wrap_sync, Invocation, Wrapped};
