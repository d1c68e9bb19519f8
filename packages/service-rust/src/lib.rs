//! `hookwrap` Service — tower integration for lifecycle hooks.
//!
//! - [`layer`]: `LifecycleLayer` / `LifecycleService` middleware
//! - [`pipeline`]: Composes the layer over a service into a type-erased handle

pub mod layer;
pub mod pipeline;

pub use layer::{LifecycleLayer, LifecycleService};
pub use pipeline::{build_lifecycle_pipeline, LifecyclePipeline};
