use bytemuck::{Pod, Zeroable};

/// Number of floats in one interleaved vertex record.
pub const FLOATS_PER_VERTEX: usize = 8;

/// Interleaved vertex: position at location 0, color at location 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x4, // position
        1 => Float32x4  // color
    ];

    #[inline]
    pub const fn new(position: [f32; 4], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }

    /// Number of complete records in a flat float slice.
    ///
    /// Saturates at `u32::MAX`, the most a single draw call can address.
    #[inline]
    pub fn count_in(floats: &[f32]) -> u32 {
        records_for_len(floats.len())
    }
}

fn records_for_len(len: usize) -> u32 {
    u32::try_from(len / FLOATS_PER_VERTEX).unwrap_or(u32::MAX)
}
