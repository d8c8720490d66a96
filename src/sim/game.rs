//! Game session: cubes, input and rounds wired together

use super::cubes::CubeRegistry;
use super::input::{InputResponse, InputTracker, KeyEvent};
use super::round::{GameEvent, RoundState, RoundStateMachine};
use super::sequence::{CubeSource, Sequence, SeededSource, SequenceGenerator};
use super::sound::SoundSink;
use crate::error::Result;
use crate::settings::Timing;

/// One running game of Musical Bloom.
///
/// Key events arrive between frames through [`MusicalBloom::handle_key`];
/// [`MusicalBloom::update`] then hands at most one pending choice to the
/// round logic.
pub struct MusicalBloom {
    cubes: CubeRegistry,
    input: InputTracker,
    rounds: RoundStateMachine,
}

impl MusicalBloom {
    /// Build a session; fails if the cube/sound setup or the timing is unusable
    pub fn new(cubes: CubeRegistry, source: Box<dyn CubeSource>, timing: &Timing) -> Result<Self> {
        cubes.validate()?;
        timing.validate()?;
        let generator = SequenceGenerator::new(source, cubes.len() as u32)?;

        log::info!(
            "Musical Bloom ready: {} cubes, {:.2}s per highlight",
            cubes.len(),
            timing.time_between_highlights
        );

        Ok(Self {
            cubes,
            input: InputTracker::new(),
            rounds: RoundStateMachine::new(generator, timing),
        })
    }

    /// Standard four-cube game with a seeded sequence
    pub fn seeded(seed: u64, timing: &Timing) -> Result<Self> {
        log::info!("Sequence seed: {}", seed);
        Self::new(CubeRegistry::standard(), Box::new(SeededSource::new(seed)), timing)
    }

    pub fn handle_key(&mut self, event: &KeyEvent, sink: &mut dyn SoundSink) -> InputResponse {
        let playback_active = self.rounds.is_playing_sequence();
        self.input
            .handle_event(event, playback_active, &mut self.cubes, sink)
    }

    /// Advance the game by `elapsed` seconds
    pub fn update(&mut self, elapsed: f32, sink: &mut dyn SoundSink) -> Vec<GameEvent> {
        let choice = self.input.take_choice();
        self.rounds.update(elapsed, choice, &mut self.cubes, sink)
    }

    /// Let go of a half-finished key press; playback highlights stay lit
    pub fn release_held_key(&mut self) {
        self.input.release_held(&mut self.cubes);
    }

    pub fn cubes(&self) -> &CubeRegistry {
        &self.cubes
    }

    pub fn state(&self) -> RoundState {
        self.rounds.state()
    }

    pub fn sequence(&self) -> &Sequence {
        self.rounds.sequence()
    }

    pub fn round(&self) -> u32 {
        self.rounds.round()
    }

    pub fn player_streak(&self) -> usize {
        self.rounds.player_streak()
    }

    pub fn game_over(&self) -> bool {
        self.rounds.game_over()
    }

    pub fn last_score(&self) -> Option<u32> {
        self.rounds.last_score()
    }

    pub fn pending_choice(&self) -> Option<u32> {
        self.input.pending_choice()
    }
}
