//! The row of interactive cubes and their sounds

use glam::Vec3;

use super::sound::{Note, PlayMode, SoundSink};
use crate::consts::{CUBE_MESHES, CUBE_POSITIONS, NOTE_GAIN};
use crate::error::{BloomError, Result};

/// One interactive cube
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pub index: u32,
    /// Lit cubes are drawn with the highlight program
    pub active: bool,
    /// Renderable object handle (mesh name in the shared mesh buffer)
    pub mesh: String,
    /// World position, also used to place the cube's sound
    pub position: Vec3,
}

/// Owns cube highlight state and the cube-to-sound pairing.
///
/// Callers only issue commands (activate, deactivate, reset, play); nothing
/// outside the registry flips a cube's flag directly.
#[derive(Debug, Clone, Default)]
pub struct CubeRegistry {
    cubes: Vec<Cube>,
    sounds: Vec<Note>,
}

impl CubeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four-cube layout: green/A, red/C, blue/D, yellow/E
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for (mesh, pos) in CUBE_MESHES.iter().zip(CUBE_POSITIONS) {
            registry.add_cube(mesh, Vec3::from_array(pos));
        }
        for note in Note::ALL {
            registry.add_sound(note);
        }
        registry
    }

    /// Append a cube; returns its index
    pub fn add_cube(&mut self, mesh: &str, position: Vec3) -> u32 {
        let index = self.cubes.len() as u32;
        self.cubes.push(Cube {
            index,
            active: false,
            mesh: mesh.to_string(),
            position,
        });
        index
    }

    /// Append a sound; pairs with the cube of the same index
    pub fn add_sound(&mut self, note: Note) {
        self.sounds.push(note);
    }

    /// True when every cube has exactly one sound
    pub fn is_valid(&self) -> bool {
        self.cubes.len() == self.sounds.len()
    }

    /// Fails with the configuration error that keeps the game from starting
    pub fn validate(&self) -> Result<()> {
        if self.cubes.is_empty() {
            return Err(BloomError::NoCubes);
        }
        if !self.is_valid() {
            return Err(BloomError::CubeSoundMismatch {
                cubes: self.cubes.len(),
                sounds: self.sounds.len(),
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn cube(&self, index: u32) -> Option<&Cube> {
        self.cubes.get(index as usize)
    }

    pub fn sound(&self, index: u32) -> Option<Note> {
        self.sounds.get(index as usize).copied()
    }

    /// Lowest-indexed lit cube, if any
    pub fn active_index(&self) -> Option<u32> {
        self.cubes.iter().find(|c| c.active).map(|c| c.index)
    }

    pub fn activate(&mut self, index: u32) -> Result<()> {
        self.cube_mut(index)?.active = true;
        Ok(())
    }

    pub fn deactivate(&mut self, index: u32) -> Result<()> {
        self.cube_mut(index)?.active = false;
        Ok(())
    }

    pub fn reset_all(&mut self) {
        for cube in &mut self.cubes {
            cube.active = false;
        }
    }

    /// Fire the cube's note once at the cube's position
    pub fn play_sound(&self, index: u32, sink: &mut dyn SoundSink) -> Result<()> {
        let cube = self.cube(index).ok_or(self.out_of_range(index))?;
        let note = self.sound(index).ok_or(self.out_of_range(index))?;
        sink.play(note, cube.position, NOTE_GAIN, PlayMode::Once);
        Ok(())
    }

    fn cube_mut(&mut self, index: u32) -> Result<&mut Cube> {
        let err = self.out_of_range(index);
        self.cubes.get_mut(index as usize).ok_or(err)
    }

    fn out_of_range(&self, index: u32) -> BloomError {
        BloomError::CubeOutOfRange {
            index,
            count: self.cubes.len(),
        }
    }
}
