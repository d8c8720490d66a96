//! Crate error type

/// Result alias carrying [`BloomError`].
pub type Result<T> = std::result::Result<T, BloomError>;

/// Errors surfaced at setup time or at a collaborator boundary.
///
/// Gameplay mistakes (pressing the wrong cube) are not errors; they are
/// ordinary transitions of the round state machine.
#[derive(Debug, thiserror::Error)]
pub enum BloomError {
    /// Every cube needs exactly one sound.
    #[error("mismatched number of cubes ({cubes}) and sounds ({sounds})")]
    CubeSoundMismatch { cubes: usize, sounds: usize },

    /// The game needs at least one cube to pick from.
    #[error("no cubes registered")]
    NoCubes,

    #[error("cube index {index} out of range (have {count} cubes)")]
    CubeOutOfRange { index: u32, count: usize },

    /// Timing values must be finite and non-negative.
    #[error("invalid timing for `{name}`: {value}")]
    InvalidTiming { name: &'static str, value: f32 },

    #[error("mesh `{0}` not found in mesh buffer")]
    MissingMesh(String),

    /// Adapter, device or surface setup failed.
    #[error("graphics: {0}")]
    Gpu(String),

    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
