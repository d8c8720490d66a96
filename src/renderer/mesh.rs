//! Mesh generation for the cube row and floor
//!
//! Every mesh lives in one shared vertex buffer and is addressed by name,
//! so a cube's `mesh` field is all the renderer needs to draw it.

use std::collections::HashMap;
use std::ops::Range;

use glam::Vec3;

use super::vertex::{Vertex, colors};
use crate::consts::{
    CUBE_HALF_EXTENT, CUBE_MESHES, CUBE_POSITIONS, FLOOR_CENTER, FLOOR_HALF_SIZE, FLOOR_MESH,
};
use crate::error::{BloomError, Result};

/// Where a named mesh sits in the shared vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRange {
    pub first: u32,
    pub count: u32,
}

impl MeshRange {
    pub fn vertices(&self) -> Range<u32> {
        self.first..self.first + self.count
    }
}

/// Two triangles spanning `center ± u ± v`, wound counter-clockwise around `u × v`
fn quad(center: Vec3, u: Vec3, v: Vec3, color: [f32; 4]) -> [Vertex; 6] {
    let normal = u.cross(v).normalize_or_zero().to_array();
    let corner = |p: Vec3| Vertex::new(p.to_array(), normal, color);
    let a = corner(center - u - v);
    let b = corner(center + u - v);
    let c = corner(center + u + v);
    let d = corner(center - u + v);
    [a, b, c, a, c, d]
}

/// Axis-aligned cube, 36 vertices
pub fn cube(center: Vec3, half_extent: f32, color: [f32; 4]) -> Vec<Vertex> {
    // (normal, u, v) with u × v == normal
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let h = half_extent;
    FACES
        .iter()
        .flat_map(|&(n, u, v)| quad(center + n * h, u * h, v * h, color))
        .collect()
}

/// Horizontal square facing up
pub fn floor(center: Vec3, half_size: f32, color: [f32; 4]) -> Vec<Vertex> {
    quad(center, Vec3::X * half_size, Vec3::NEG_Z * half_size, color).to_vec()
}

/// Named meshes packed into one vertex list
#[derive(Debug, Clone, Default)]
pub struct MeshBuffer {
    vertices: Vec<Vertex>,
    ranges: HashMap<String, MeshRange>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Floor plus the four colored cubes
    pub fn scene() -> Self {
        let mut meshes = Self::new();
        meshes.add(
            FLOOR_MESH,
            floor(Vec3::from_array(FLOOR_CENTER), FLOOR_HALF_SIZE, colors::FLOOR),
        );
        for ((name, pos), color) in CUBE_MESHES.iter().zip(CUBE_POSITIONS).zip(colors::CUBES) {
            meshes.add(name, cube(Vec3::from_array(pos), CUBE_HALF_EXTENT, color));
        }
        meshes
    }

    /// Append a mesh; a repeated name points at the newest vertices
    pub fn add(&mut self, name: &str, vertices: Vec<Vertex>) -> MeshRange {
        let range = MeshRange {
            first: self.vertices.len() as u32,
            count: vertices.len() as u32,
        };
        self.vertices.extend(vertices);
        self.ranges.insert(name.to_string(), range);
        range
    }

    pub fn lookup(&self, name: &str) -> Result<MeshRange> {
        self.ranges
            .get(name)
            .copied()
            .ok_or_else(|| BloomError::MissingMesh(name.to_string()))
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}
