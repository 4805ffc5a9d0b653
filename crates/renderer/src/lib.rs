//! Renderer crate for shadertrace, a host window for GPU ray-tracing shaders.
//!
//! The crate loads a vertex and a fragment GLSL stage from disk, links them
//! into a `wgpu` pipeline, feeds the fragment stage the window size through
//! the `winWidth`/`winHeight` uniforms, and draws one full-screen quad per
//! redraw. Everything interesting happens in the fragment shader; the host only
//! has to get pixels to it. The overall flow is:
//!
//! ```text
//!   CLI / shadertrace
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ window ──▶ GpuBackend (wgpu context)
//!                       │
//!                       ▼
//!                RenderScene::initialise ──▶ loader ─▶ compile ─▶ contract
//!                       │
//!                       └─▶ winit event loop ──▶ RenderScene::display()
//! ```
//!
//! `RenderScene` is generic over [`RenderBackend`], so the start-up and
//! per-frame logic is tested against a recording backend while the window
//! path uses the `wgpu` one.

pub mod backend;
pub mod compile;
pub mod console;
pub mod contract;
pub mod geometry;
pub mod loader;
pub mod scene;
pub mod types;
pub mod uniforms;

mod gpu;
#[cfg(test)]
mod testing;
mod window;

use anyhow::Result;

pub use backend::{FrameError, LinkError, RenderBackend};
pub use gpu::{AdapterProfile, ContextError};
pub use scene::{InitError, InitReport, RenderScene};
pub use types::{
    ContextProfile, MissingSourcePolicy, RedrawMode, RendererConfig, SceneConfig,
    ShaderFailurePolicy, ShaderPaths, StageKind,
};
pub use console::{Console, DEVICE_FAILURE_MESSAGE, DEVICE_SUCCESS_MESSAGE};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the window and blocks until it is closed.
    ///
    /// Returns an error when no GPU device can be created, when a strict
    /// shader policy rejects the sources, or when presentation fails fatally.
    pub fn run(&mut self) -> Result<()> {
        window::run_window(self.config.clone())
    }
}
