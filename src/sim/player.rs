//! Timed playback of the round sequence
//!
//! One cube is lit (and its note played) every `time_between_highlights`
//! seconds. The timer is integrated from frame deltas only, so playback is
//! fully determined by the elapsed values it is fed.

use serde::{Deserialize, Serialize};

use super::cubes::CubeRegistry;
use super::sequence::Sequence;
use super::sound::SoundSink;
use crate::settings::Timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    NotPlaying,
    Playing,
}

/// What a single playback update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStep {
    /// Not playing; nothing happened
    Inactive,
    /// Timer still running
    Waiting,
    /// Cube `cube` (sequence entry `position`) was lit and sounded
    Played { position: usize, cube: u32 },
    /// Whole sequence shown; playback stopped
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequencePlayer {
    state: PlaybackState,
    /// Next sequence entry to show
    sequence_position: usize,
    /// Seconds until the next step fires
    time_to_next_event: f32,
    time_between_highlights: f32,
    time_between_rounds: f32,
}

impl SequencePlayer {
    pub fn new(timing: &Timing) -> Self {
        Self {
            state: PlaybackState::NotPlaying,
            sequence_position: 0,
            time_to_next_event: 0.0,
            time_between_highlights: timing.time_between_highlights,
            time_between_rounds: timing.time_between_rounds,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn sequence_position(&self) -> usize {
        self.sequence_position
    }

    pub fn time_to_next_event(&self) -> f32 {
        self.time_to_next_event
    }

    /// Begin playback from the first entry; the first step fires on the next update
    pub fn start(&mut self) {
        self.state = PlaybackState::Playing;
        self.sequence_position = 0;
        self.time_to_next_event = 0.0;
    }

    /// Advance playback by `elapsed` seconds
    pub fn update(
        &mut self,
        elapsed: f32,
        sequence: &Sequence,
        cubes: &mut CubeRegistry,
        sink: &mut dyn SoundSink,
    ) -> PlaybackStep {
        if self.state == PlaybackState::NotPlaying {
            return PlaybackStep::Inactive;
        }

        self.time_to_next_event -= elapsed;
        if self.time_to_next_event > 0.0 {
            return PlaybackStep::Waiting;
        }

        match sequence.get(self.sequence_position) {
            Some(cube) => {
                cubes.reset_all();
                if let Err(e) = cubes.activate(cube) {
                    log::warn!("Playback skipped highlight: {}", e);
                }
                if let Err(e) = cubes.play_sound(cube, sink) {
                    log::warn!("Playback skipped sound: {}", e);
                }

                let position = self.sequence_position;
                log::debug!("Playback step {}: cube {}", position, cube + 1);
                self.sequence_position += 1;
                self.time_to_next_event = self.time_between_highlights;
                PlaybackStep::Played { position, cube }
            }
            None => {
                cubes.reset_all();
                self.state = PlaybackState::NotPlaying;
                self.sequence_position = 0;
                self.time_to_next_event = self.time_between_rounds;
                PlaybackStep::Finished
            }
        }
    }
}
