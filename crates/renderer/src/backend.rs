//! Seam between the scene logic and the graphics API.
//!
//! [`RenderScene`](crate::scene::RenderScene) only talks to a
//! [`RenderBackend`]; the `wgpu` implementation lives in `gpu`, and tests swap
//! in a recording backend so initialisation and per-frame behaviour can be
//! checked without a GPU.
use thiserror::Error;

use crate::compile::CompiledStage;
use crate::contract::ContractError;
use crate::geometry::QuadVertex;
use crate::uniforms::WindowUniforms;

/// Linking a vertex/fragment pair into a program failed.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("interface mismatch: {0}")]
    Contract(#[from] ContractError),

    #[error("{0}")]
    Driver(String),
}

impl LinkError {
    /// Linker diagnostic text.
    pub fn log(&self) -> String {
        self.to_string()
    }
}

/// Drawing or presenting a frame failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("surface lost or outdated")]
    Lost,

    #[error("timed out acquiring the next frame")]
    Timeout,

    #[error("out of memory")]
    OutOfMemory,

    #[error("{0}")]
    Other(String),
}

/// Graphics operations the scene needs, in the order it needs them.
pub trait RenderBackend {
    /// Linked shader program together with its uniform storage.
    type Program;
    /// Uploaded vertex buffer and its layout.
    type Geometry;

    /// Links two compiled stages into a program.
    fn link(
        &mut self,
        vertex: &CompiledStage,
        fragment: &CompiledStage,
    ) -> Result<Self::Program, LinkError>;

    /// Writes the window uniforms into the program's uniform storage.
    fn write_uniforms(&mut self, program: &Self::Program, uniforms: &WindowUniforms);

    /// Uploads the static quad once.
    fn upload_quad(&mut self, vertices: &[QuadVertex]) -> Self::Geometry;

    /// Clears to `clear` and issues one draw over every vertex of `geometry`.
    fn draw(
        &mut self,
        program: &Self::Program,
        geometry: &Self::Geometry,
        clear: wgpu::Color,
    ) -> Result<(), FrameError>;

    /// Rebuilds the presentation surface for the window's current size, after
    /// [`FrameError::Lost`] or a platform resize. Uniforms are left untouched.
    fn reconfigure_surface(&mut self, width: u32, height: u32);

    /// One-line description of the device, printed after start-up succeeds.
    fn adapter_summary(&self) -> String;
}
