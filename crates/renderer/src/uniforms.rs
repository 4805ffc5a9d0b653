use bytemuck::{Pod, Zeroable};

/// Host copy of the `WindowParams` uniform block.
///
/// The layout must match the std140 block injected by `compile.rs`: two floats
/// at offsets 0 and 4, padded to the 16-byte size std140 gives the block.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowUniforms {
    pub win_width: f32,
    pub win_height: f32,
    pub padding: [f32; 2],
}

unsafe impl Zeroable for WindowUniforms {}
unsafe impl Pod for WindowUniforms {}

impl WindowUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            win_width: width as f32,
            win_height: height as f32,
            padding: [0.0; 2],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_std140_block() {
        assert_eq!(std::mem::size_of::<WindowUniforms>(), 16);
        let uniforms = WindowUniforms::new(600, 600);
        let bytes = uniforms.as_bytes();
        assert_eq!(&bytes[0..4], &600.0_f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &600.0_f32.to_ne_bytes());
    }

    #[test]
    fn keeps_width_and_height_apart() {
        let uniforms = WindowUniforms::new(800, 450);
        assert_eq!(uniforms.win_width, 800.0);
        assert_eq!(uniforms.win_height, 450.0);
    }
}
