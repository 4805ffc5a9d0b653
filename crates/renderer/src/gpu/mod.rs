//! `wgpu` implementation of [`RenderBackend`](crate::backend::RenderBackend).
//!
//! - `context` owns the instance, surface, adapter and device, and rebuilds the
//!   swapchain when the window asks for it.
//! - `pipeline` turns a compiled vertex/fragment pair into a render pipeline
//!   with one uniform bind group, reporting driver validation errors as link
//!   failures.
//! - `state` glues both together behind the backend trait used by `window`.

mod context;
mod pipeline;
mod state;

pub use context::{AdapterProfile, ContextError};
pub(crate) use state::GpuBackend;
