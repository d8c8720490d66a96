//! Vertex types for the lit 3D scene

use bytemuck::{Pod, Zeroable};

/// World-space vertex with a face normal and base color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const GREEN_CUBE: [f32; 4] = [0.2, 0.85, 0.35, 1.0];
    pub const RED_CUBE: [f32; 4] = [0.95, 0.25, 0.25, 1.0];
    pub const BLUE_CUBE: [f32; 4] = [0.25, 0.45, 1.0, 1.0];
    pub const YELLOW_CUBE: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    /// Same order as the cube row
    pub const CUBES: [[f32; 4]; 4] = [GREEN_CUBE, RED_CUBE, BLUE_CUBE, YELLOW_CUBE];
    pub const FLOOR: [f32; 4] = [0.18, 0.18, 0.24, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
