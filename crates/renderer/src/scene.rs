//! One-time render setup and the per-frame draw.
//!
//! `RenderScene` owns the linked program, the uploaded quad and the uniform
//! values. Construction is
//! the transition into the running state; dropping the scene releases every
//! GPU object it owns.
//!
//! ```text
//!   load vertex ─┐                    ┌─ fallback stage (policy)
//!   load frag ───┴─▶ compile ─────────┤
//!                                     ▼
//!                 contract + backend link ─▶ write uniforms ─▶ upload quad
//! ```
use std::path::Path;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::backend::{FrameError, LinkError, RenderBackend};
use crate::compile::{compile_stage, fallback_stage, CompileError, CompiledStage};
use crate::console::{Console, COMPILE_FAILURE_PREFIX, LINK_FAILURE_PREFIX, OPEN_FAILURE_MESSAGE};
use crate::contract;
use crate::geometry::QUAD_VERTICES;
use crate::loader::{load_source, LoadError};
use crate::types::{SceneConfig, ShaderFailurePolicy, StageKind};
use crate::uniforms::WindowUniforms;

/// Colour the framebuffer is cleared to before every draw.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("shader compilation failed")]
    Compile(#[source] CompileError),

    #[error("failed to link shader program")]
    Link(#[source] LinkError),

    #[error("built-in fallback shader is unusable: {0}")]
    Fallback(String),
}

/// What went wrong during initialisation under the lenient policies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Stages whose file could not be opened.
    pub missing_sources: Vec<StageKind>,
    /// Stages whose source failed to compile.
    pub compile_failures: Vec<StageKind>,
    /// The user's stage pair failed to link.
    pub link_failed: bool,
    /// The running program contains at least one built-in stage.
    pub fallback: bool,
}

impl InitReport {
    pub fn is_degraded(&self) -> bool {
        !self.missing_sources.is_empty()
            || !self.compile_failures.is_empty()
            || self.link_failed
            || self.fallback
    }
}

/// Render state of a running harness.
pub struct RenderScene<B: RenderBackend> {
    backend: B,
    program: B::Program,
    geometry: B::Geometry,
    uniforms: WindowUniforms,
    report: InitReport,
    frames: u64,
}

impl<B: RenderBackend> RenderScene<B> {
    /// Loads, compiles and links both stages, writes the uniforms and uploads
    /// the quad. User-facing failure lines go to `console`.
    pub fn initialise(
        mut backend: B,
        config: &SceneConfig,
        console: &mut Console<'_>,
    ) -> Result<Self, InitError> {
        let mut report = InitReport::default();

        let vertex = prepare_stage(
            StageKind::Vertex,
            &config.shaders.vertex,
            config,
            console,
            &mut report,
        )?;
        let fragment = prepare_stage(
            StageKind::Fragment,
            &config.shaders.fragment,
            config,
            console,
            &mut report,
        )?;

        let program = link_program(
            &mut backend,
            &vertex,
            &fragment,
            config.shader_failure,
            console,
            &mut report,
        )?;

        let uniforms = WindowUniforms::new(config.size.0, config.size.1);
        backend.write_uniforms(&program, &uniforms);
        let geometry = backend.upload_quad(&QUAD_VERTICES);

        info!(
            width = uniforms.win_width,
            height = uniforms.win_height,
            degraded = report.is_degraded(),
            "render scene initialised"
        );

        Ok(Self {
            backend,
            program,
            geometry,
            uniforms,
            report,
            frames: 0,
        })
    }

    /// Display callback: clear and draw the quad once.
    pub fn display(&mut self) -> Result<(), FrameError> {
        self.backend.draw(&self.program, &self.geometry, CLEAR_COLOR)?;
        self.frames += 1;
        Ok(())
    }

    /// Reconfigures the presentation surface; the uniforms keep their
    /// start-up values.
    pub fn reconfigure_surface(&mut self, width: u32, height: u32) {
        self.backend.reconfigure_surface(width, height);
    }

    /// Values written to `winWidth`/`winHeight` at start-up.
    pub fn uniforms(&self) -> WindowUniforms {
        self.uniforms
    }

    pub fn report(&self) -> &InitReport {
        &self.report
    }

    /// Frames drawn successfully so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

fn prepare_stage(
    stage: StageKind,
    path: &Path,
    config: &SceneConfig,
    console: &mut Console<'_>,
    report: &mut InitReport,
) -> Result<CompiledStage, InitError> {
    let source = match load_source(stage, path, config.missing_source) {
        Ok(source) => source,
        Err(err) => {
            console.out_line(OPEN_FAILURE_MESSAGE);
            return Err(err.into());
        }
    };
    if source.missing {
        console.out_line(OPEN_FAILURE_MESSAGE);
        warn!(%stage, path = %path.display(), "compiling empty source for unreadable shader");
        report.missing_sources.push(stage);
    }

    match compile_stage(&source) {
        Ok(compiled) => Ok(compiled),
        Err(err) => {
            console.err_line(&format!("{COMPILE_FAILURE_PREFIX}{}", err.log()));
            error!(%stage, path = %path.display(), error = %err, "shader compilation failed");
            report.compile_failures.push(stage);
            match config.shader_failure {
                ShaderFailurePolicy::Abort => Err(InitError::Compile(err)),
                ShaderFailurePolicy::Fallback => {
                    warn!(%stage, "substituting built-in shader");
                    report.fallback = true;
                    fallback_stage(stage).map_err(|err| InitError::Fallback(err.to_string()))
                }
            }
        }
    }
}

fn link_program<B: RenderBackend>(
    backend: &mut B,
    vertex: &CompiledStage,
    fragment: &CompiledStage,
    policy: ShaderFailurePolicy,
    console: &mut Console<'_>,
    report: &mut InitReport,
) -> Result<B::Program, InitError> {
    let err = match link_checked(backend, vertex, fragment) {
        Ok(program) => return Ok(program),
        Err(err) => err,
    };

    console.err_line(&format!("{LINK_FAILURE_PREFIX}{}", err.log()));
    error!(error = %err, "shader program failed to link");
    report.link_failed = true;

    match policy {
        ShaderFailurePolicy::Abort => Err(InitError::Link(err)),
        ShaderFailurePolicy::Fallback => {
            warn!("linking built-in shader pair");
            report.fallback = true;
            let vertex = fallback_stage(StageKind::Vertex)
                .map_err(|err| InitError::Fallback(err.to_string()))?;
            let fragment = fallback_stage(StageKind::Fragment)
                .map_err(|err| InitError::Fallback(err.to_string()))?;
            link_checked(backend, &vertex, &fragment)
                .map_err(|err| InitError::Fallback(err.to_string()))
        }
    }
}

fn link_checked<B: RenderBackend>(
    backend: &mut B,
    vertex: &CompiledStage,
    fragment: &CompiledStage,
) -> Result<B::Program, LinkError> {
    contract::validate(vertex, fragment)?;
    let program = backend.link(vertex, fragment)?;
    debug!(
        vertex_fallback = vertex.fallback,
        fragment_fallback = fragment.fallback,
        "linked shader program"
    );
    Ok(program)
}
