//! WebGPU rendering module
//!
//! Draws the floor and cube row with a fixed camera. Cube state is read from
//! the [`CubeRegistry`](crate::sim::CubeRegistry) every frame; the renderer
//! never changes it.

pub mod camera;
pub mod mesh;
pub mod pipeline;
pub mod vertex;

pub use camera::Camera;
pub use mesh::{MeshBuffer, MeshRange};
pub use pipeline::RenderState;
pub use vertex::Vertex;
