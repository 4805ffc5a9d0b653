//! Test doubles shared by the unit tests.
use crate::backend::{FrameError, LinkError, RenderBackend};
use crate::compile::CompiledStage;
use crate::geometry::QuadVertex;
use crate::uniforms::WindowUniforms;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DrawCall {
    pub(crate) vertex_count: usize,
    pub(crate) clear: wgpu::Color,
}

#[derive(Debug)]
pub(crate) struct MockProgram {
    pub(crate) id: usize,
    pub(crate) vertex_fallback: bool,
    pub(crate) fragment_fallback: bool,
}

#[derive(Debug)]
pub(crate) struct MockGeometry {
    pub(crate) vertices: Vec<QuadVertex>,
}

#[derive(Default)]
pub(crate) struct RecordingBackend {
    pub(crate) links: usize,
    pub(crate) failing_links: usize,
    pub(crate) uniform_writes: Vec<(usize, WindowUniforms)>,
    pub(crate) uploads: usize,
    pub(crate) draws: Vec<DrawCall>,
    pub(crate) next_frame_error: Option<FrameError>,
    pub(crate) reconfigurations: Vec<(u32, u32)>,
}

impl RenderBackend for RecordingBackend {
    type Program = MockProgram;
    type Geometry = MockGeometry;

    fn link(
        &mut self,
        vertex: &CompiledStage,
        fragment: &CompiledStage,
    ) -> Result<MockProgram, LinkError> {
        if self.failing_links > 0 {
            self.failing_links -= 1;
            return Err(LinkError::Driver("driver rejected pipeline".into()));
        }
        self.links += 1;
        Ok(MockProgram {
            id: self.links,
            vertex_fallback: vertex.fallback,
            fragment_fallback: fragment.fallback,
        })
    }

    fn write_uniforms(&mut self, program: &MockProgram, uniforms: &WindowUniforms) {
        self.uniform_writes.push((program.id, *uniforms));
    }

    fn upload_quad(&mut self, vertices: &[QuadVertex]) -> MockGeometry {
        self.uploads += 1;
        MockGeometry {
            vertices: vertices.to_vec(),
        }
    }

    fn draw(
        &mut self,
        _program: &MockProgram,
        geometry: &MockGeometry,
        clear: wgpu::Color,
    ) -> Result<(), FrameError> {
        if let Some(err) = self.next_frame_error.take() {
            return Err(err);
        }
        self.draws.push(DrawCall {
            vertex_count: geometry.vertices.len(),
            clear,
        });
        Ok(())
    }

    fn reconfigure_surface(&mut self, width: u32, height: u32) {
        self.reconfigurations.push((width, height));
    }

    fn adapter_summary(&self) -> String {
        "recording backend".to_string()
    }
}
