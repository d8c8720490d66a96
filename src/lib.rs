//! Musical Bloom - a repeat-the-sequence memory game
//!
//! Core modules:
//! - `sim`: Deterministic game logic (sequence, cubes, playback, input, rounds)
//! - `app`: Mode dispatch (playing / pause overlay / quit) and high score hookup
//! - `renderer`: WebGPU rendering of the cube row
//! - `audio`: Web Audio synthesis of the cube notes (wasm only)

pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{BloomApp, Mode};
pub use error::{BloomError, Result};
pub use highscores::HighScores;
pub use settings::{Settings, Timing};

/// Game configuration constants
pub mod consts {
    /// Number of cubes (and notes) in the game
    pub const CUBE_COUNT: usize = 4;

    /// Seconds each cube stays lit while the sequence plays back
    pub const TIME_BETWEEN_HIGHLIGHTS: f32 = 1.0;
    /// Seconds loaded into the playback timer once a sequence has finished
    pub const TIME_BETWEEN_ROUNDS: f32 = 2.5;

    /// Longest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Gain used for every cube note
    pub const NOTE_GAIN: f32 = 1.0;

    /// Cube centers in world space, left to right
    pub const CUBE_POSITIONS: [[f32; 3]; CUBE_COUNT] = [
        [-4.5, 0.0, 0.0],
        [-1.5, 0.0, 0.0],
        [1.5, 0.0, 0.0],
        [4.5, 0.0, 0.0],
    ];
    /// Mesh names of the cubes, same order as [`CUBE_POSITIONS`]
    pub const CUBE_MESHES: [&str; CUBE_COUNT] = ["GreenCube", "RedCube", "BlueCube", "YellowCube"];
    /// Half of a cube's edge length
    pub const CUBE_HALF_EXTENT: f32 = 1.0;

    /// Floor plane mesh name
    pub const FLOOR_MESH: &str = "Floor";
    /// Floor center and half size (x, z)
    pub const FLOOR_CENTER: [f32; 3] = [0.0, -3.0, 2.0];
    pub const FLOOR_HALF_SIZE: f32 = 10.0;

    /// Camera placement
    pub const CAMERA_POSITION: [f32; 3] = [0.0, 6.0, 20.0];
    /// Downward tilt of the camera (degrees)
    pub const CAMERA_PITCH_DEG: f32 = 15.0;
    pub const CAMERA_FOV_DEG: f32 = 45.0;
}
