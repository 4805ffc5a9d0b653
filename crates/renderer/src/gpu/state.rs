use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::backend::{FrameError, LinkError, RenderBackend};
use crate::compile::CompiledStage;
use crate::geometry::QuadVertex;
use crate::types::ContextProfile;
use crate::uniforms::WindowUniforms;

use super::context::{AdapterProfile, ContextError, GpuContext};
use super::pipeline::{link_program, GpuProgram};

/// Vertex buffer holding the static quad.
pub(crate) struct GpuGeometry {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

/// [`RenderBackend`] that draws through `wgpu` into a window surface.
pub(crate) struct GpuBackend {
    context: GpuContext,
}

impl GpuBackend {
    pub(crate) fn new<T>(
        target: &T,
        size: PhysicalSize<u32>,
        profile: ContextProfile,
    ) -> Result<Self, ContextError>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, size, profile)?;
        Ok(Self { context })
    }

    pub(crate) fn adapter_profile(&self) -> &AdapterProfile {
        &self.context.adapter_profile
    }
}

impl RenderBackend for GpuBackend {
    type Program = GpuProgram;
    type Geometry = GpuGeometry;

    fn link(
        &mut self,
        vertex: &CompiledStage,
        fragment: &CompiledStage,
    ) -> Result<Self::Program, LinkError> {
        link_program(&self.context, vertex, fragment)
    }

    fn write_uniforms(&mut self, program: &Self::Program, uniforms: &WindowUniforms) {
        self.context
            .queue
            .write_buffer(&program.uniform_buffer, 0, uniforms.as_bytes());
    }

    fn upload_quad(&mut self, vertices: &[QuadVertex]) -> Self::Geometry {
        let buffer = self
            .context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad vertices"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        GpuGeometry {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    fn draw(
        &mut self,
        program: &Self::Program,
        geometry: &Self::Geometry,
        clear: wgpu::Color,
    ) -> Result<(), FrameError> {
        let frame = self
            .context
            .surface
            .get_current_texture()
            .map_err(frame_error)?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&program.pipeline);
            render_pass.set_bind_group(0, &program.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, geometry.buffer.slice(..));
            render_pass.draw(0..geometry.vertex_count, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            "presented frame size={}x{}",
            self.context.config.width,
            self.context.config.height
        );
        Ok(())
    }

    fn reconfigure_surface(&mut self, width: u32, height: u32) {
        self.context.reconfigure(PhysicalSize::new(width, height));
    }

    fn adapter_summary(&self) -> String {
        let profile = &self.context.adapter_profile;
        format!(
            "{} ({:?}, {:?})",
            profile.name, profile.backend, profile.device_type
        )
    }
}

fn frame_error(error: wgpu::SurfaceError) -> FrameError {
    match error {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => FrameError::Lost,
        wgpu::SurfaceError::Timeout => FrameError::Timeout,
        wgpu::SurfaceError::OutOfMemory => FrameError::OutOfMemory,
        other => FrameError::Other(other.to_string()),
    }
}
