use bytemuck::{Pod, Zeroable};

use crate::contract::POSITION_LOCATION;

/// Number of vertices drawn every frame.
pub const QUAD_VERTEX_COUNT: u32 = 4;

/// One clip-space corner of the full-screen quad.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

/// Corners of the clip-space square (-1,-1)..(1,1), in triangle-strip order.
///
/// The two strip triangles are (v0, v1, v2) and (v1, v2, v3), which together
/// cover the whole square with a single 4-vertex draw.
pub const QUAD_VERTICES: [QuadVertex; QUAD_VERTEX_COUNT as usize] = [
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [-1.0, 1.0] },
    QuadVertex { position: [1.0, 1.0] },
];

const QUAD_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![POSITION_LOCATION => Float32x2];

/// Primitive topology matching the vertex order of [`QUAD_VERTICES`].
pub const QUAD_TOPOLOGY: wgpu::PrimitiveTopology = wgpu::PrimitiveTopology::TriangleStrip;

/// Layout of the quad buffer: one `vec2` at location 0, tightly packed.
pub fn quad_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &QUAD_ATTRIBUTES,
    }
}

/// Raw bytes uploaded into the static vertex buffer.
pub fn quad_bytes() -> &'static [u8] {
    bytemuck::cast_slice(&QUAD_VERTICES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
        ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])) * 0.5
    }

    #[test]
    fn quad_spans_clip_space_corners() {
        let mut corners: Vec<[f32; 2]> = QUAD_VERTICES.iter().map(|v| v.position).collect();
        corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            corners,
            vec![[-1.0, -1.0], [-1.0, 1.0], [1.0, -1.0], [1.0, 1.0]]
        );
    }

    #[test]
    fn strip_triangles_cover_whole_square() {
        let v = QUAD_VERTICES.map(|vertex| vertex.position);
        let first = signed_area(v[0], v[1], v[2]).abs();
        let second = signed_area(v[1], v[2], v[3]).abs();
        assert_eq!(first + second, 4.0);
    }

    #[test]
    fn layout_is_tightly_packed_vec2() {
        let layout = quad_layout();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(quad_bytes().len(), 4 * 8);
    }
}
