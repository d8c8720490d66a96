//! Deterministic game module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through the elapsed values passed to `update`
//! - Seeded or injected cube picks only
//! - Sound goes through the [`SoundSink`] trait
//! - No rendering or platform dependencies

pub mod cubes;
pub mod game;
pub mod input;
pub mod player;
pub mod round;
pub mod sequence;
pub mod sound;

pub use cubes::{Cube, CubeRegistry};
pub use game::MusicalBloom;
pub use input::{InputResponse, InputTracker, Key, KeyAction, KeyEvent};
pub use player::{PlaybackState, PlaybackStep, SequencePlayer};
pub use round::{GameEvent, RoundState, RoundStateMachine};
pub use sequence::{CubeSource, SeededSource, Sequence, SequenceGenerator};
pub use sound::{Note, PlayMode, SilentSink, SoundSink, stereo_pan};
