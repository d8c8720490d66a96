//! Audio collaborator contract
//!
//! The simulation never mixes audio itself. It hands a sample handle, a world
//! position and a gain to a [`SoundSink`] and moves on.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Sample handle: one xylophone note per cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    A,
    C,
    D,
    E,
}

impl Note {
    /// Notes in cube order
    pub const ALL: [Note; 4] = [Note::A, Note::C, Note::D, Note::E];

    /// Fundamental frequency in Hz
    pub fn frequency(self) -> f32 {
        match self {
            Note::A => 440.0,
            Note::C => 523.25,
            Note::D => 587.33,
            Note::E => 659.25,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Note::A => "A",
            Note::C => "C",
            Note::D => "D",
            Note::E => "E",
        }
    }
}

/// Horizontal distance (world units) that maps to a hard left/right pan
pub const PAN_HALF_WIDTH: f32 = 6.0;

/// Stereo pan for a sound at `position`, -1.0 (left) to 1.0 (right)
pub fn stereo_pan(position: Vec3) -> f32 {
    (position.x / PAN_HALF_WIDTH).clamp(-1.0, 1.0)
}

/// How a sample is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    #[default]
    Once,
}

/// Fire-and-forget sound playback
///
/// Implementations must return immediately; the caller never waits for a
/// sample to finish.
pub trait SoundSink {
    fn play(&mut self, note: Note, position: Vec3, gain: f32, mode: PlayMode);
}

/// Sink that drops every request (headless runs, muted setups)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl SoundSink for SilentSink {
    fn play(&mut self, _note: Note, _position: Vec3, _gain: f32, _mode: PlayMode) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records every play request in order
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub played: Vec<Note>,
    }

    impl SoundSink for RecordingSink {
        fn play(&mut self, note: Note, _position: Vec3, _gain: f32, mode: PlayMode) {
            assert_eq!(mode, PlayMode::Once);
            self.played.push(note);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CUBE_POSITIONS;

    #[test]
    fn test_cube_row_pans_left_to_right() {
        let pans: Vec<f32> = CUBE_POSITIONS
            .iter()
            .map(|&p| stereo_pan(Vec3::from_array(p)))
            .collect();
        assert!(pans.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(pans[0], -0.75);
        assert_eq!(pans[3], 0.75);
        assert_eq!(stereo_pan(Vec3::new(-40.0, 0.0, 0.0)), -1.0);
    }

    #[test]
    fn test_notes_ascend() {
        let freqs: Vec<f32> = Note::ALL.iter().map(|n| n.frequency()).collect();
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Note::A.as_str(), "A");
    }
}
