use std::borrow::Cow;

use wgpu::naga::ShaderStage;
use wgpu::util::DeviceExt;

use crate::backend::LinkError;
use crate::compile::CompiledStage;
use crate::geometry::{quad_layout, QUAD_TOPOLOGY};
use crate::types::StageKind;
use crate::uniforms::WindowUniforms;

use super::context::GpuContext;

/// A linked vertex/fragment pair plus the uniform buffer feeding it.
pub(crate) struct GpuProgram {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
}

/// Builds the render pipeline for `vertex` and `fragment`.
///
/// Any validation error wgpu raises while creating modules or the pipeline is
/// captured and returned as the linker log instead of aborting the process.
pub(crate) fn link_program(
    context: &GpuContext,
    vertex: &CompiledStage,
    fragment: &CompiledStage,
) -> Result<GpuProgram, LinkError> {
    let device = &context.device;
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let vertex_module = create_module(device, vertex);
    let fragment_module = create_module(device, fragment);

    let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("window uniform layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });

    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("window uniforms"),
        contents: WindowUniforms::new(0, 0).as_bytes(),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("window uniform bind group"),
        layout: &uniform_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("shader program layout"),
        bind_group_layouts: &[&uniform_layout],
        push_constant_ranges: &[],
    });

    let vertex_buffers = [quad_layout()];
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("shader program"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex_module,
            entry_point: Some("main"),
            buffers: &vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: QUAD_TOPOLOGY,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: context.surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    });

    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(LinkError::Driver(error.to_string()));
    }

    tracing::debug!(format = ?context.surface_format, "created render pipeline");

    Ok(GpuProgram {
        pipeline,
        uniform_buffer,
        uniform_bind_group,
    })
}

fn create_module(device: &wgpu::Device, stage: &CompiledStage) -> wgpu::ShaderModule {
    let (label, naga_stage) = match stage.kind {
        StageKind::Vertex => ("vertex stage", ShaderStage::Vertex),
        StageKind::Fragment => ("fragment stage", ShaderStage::Fragment),
    };
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(stage.glsl.clone()),
            stage: naga_stage,
            defines: &[],
        },
    })
}
