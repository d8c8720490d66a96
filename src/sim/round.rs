//! Round state machine
//!
//! Idle -> PlayingSequence -> AwaitingInput -> (Evaluating) -> Idle.
//! Winning a round extends the same sequence by one cube; a wrong cube ends
//! the game, clears the sequence and the next round starts over at length 1.

use serde::{Deserialize, Serialize};

use super::cubes::CubeRegistry;
use super::player::{PlaybackStep, SequencePlayer};
use super::sequence::{Sequence, SequenceGenerator};
use super::sound::SoundSink;
use crate::settings::Timing;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundState {
    /// No round in progress; the next update starts one
    #[default]
    Idle,
    /// Sequence is being shown; player input is ignored
    PlayingSequence,
    /// Waiting for the player to repeat the next entry
    AwaitingInput,
    /// A choice is being checked (only within an update)
    Evaluating,
}

/// Something that happened during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A round began; `round` is the new sequence length
    RoundStarted { round: u32 },
    /// Playback lit a cube
    StepPlayed { position: usize, cube: u32 },
    /// Playback is over; the player's turn
    PlaybackFinished,
    /// Player repeated another entry correctly
    Correct { streak: u32 },
    /// Player repeated the whole sequence
    RoundWon { round: u32 },
    /// Player picked the wrong cube; `score` is the sequence length reached
    GameOver { score: u32 },
}

pub struct RoundStateMachine {
    state: RoundState,
    sequence: Sequence,
    generator: SequenceGenerator,
    player: SequencePlayer,
    /// Entries repeated correctly this round
    player_streak: usize,
    /// Set by a loss, cleared by the next won round
    game_over: bool,
    last_score: Option<u32>,
}

impl RoundStateMachine {
    pub fn new(generator: SequenceGenerator, timing: &Timing) -> Self {
        Self {
            state: RoundState::Idle,
            sequence: Sequence::new(),
            generator,
            player: SequencePlayer::new(timing),
            player_streak: 0,
            game_over: false,
            last_score: None,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Current round number (the sequence length)
    pub fn round(&self) -> u32 {
        self.sequence.score()
    }

    pub fn player_streak(&self) -> usize {
        self.player_streak
    }

    pub fn sequence_position(&self) -> usize {
        self.player.sequence_position()
    }

    pub fn time_to_next_event(&self) -> f32 {
        self.player.time_to_next_event()
    }

    pub fn is_playing_sequence(&self) -> bool {
        self.state == RoundState::PlayingSequence
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Score of the most recently lost game
    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    /// Advance one frame.
    ///
    /// `choice` is the player's pending choice for this frame. It is only
    /// evaluated while awaiting input; in any other phase it is dropped.
    pub fn update(
        &mut self,
        elapsed: f32,
        choice: Option<u32>,
        cubes: &mut CubeRegistry,
        sink: &mut dyn SoundSink,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();

        match self.state {
            RoundState::Idle => {
                self.start_round(&mut events);
                self.advance_playback(elapsed, cubes, sink, &mut events);
            }
            RoundState::PlayingSequence => {
                self.advance_playback(elapsed, cubes, sink, &mut events);
            }
            RoundState::AwaitingInput | RoundState::Evaluating => {
                if let Some(choice) = choice {
                    self.evaluate(choice, &mut events);
                }
                return events;
            }
        }

        if let Some(choice) = choice {
            log::debug!("Dropping choice {} outside the player's turn", choice + 1);
        }
        events
    }

    fn start_round(&mut self, events: &mut Vec<GameEvent>) {
        self.generator.next(&mut self.sequence);
        let round = self.sequence.score();
        log::info!("Starting round {}", round);
        log::debug!("Sequence: {}", self.sequence);

        self.player_streak = 0;
        self.state = RoundState::PlayingSequence;
        self.player.start();
        events.push(GameEvent::RoundStarted { round });
    }

    fn advance_playback(
        &mut self,
        elapsed: f32,
        cubes: &mut CubeRegistry,
        sink: &mut dyn SoundSink,
        events: &mut Vec<GameEvent>,
    ) {
        match self.player.update(elapsed, &self.sequence, cubes, sink) {
            PlaybackStep::Played { position, cube } => {
                events.push(GameEvent::StepPlayed { position, cube });
            }
            PlaybackStep::Finished => {
                log::debug!("Sequence shown, awaiting player");
                self.state = RoundState::AwaitingInput;
                events.push(GameEvent::PlaybackFinished);
            }
            PlaybackStep::Waiting | PlaybackStep::Inactive => {}
        }
    }

    fn evaluate(&mut self, choice: u32, events: &mut Vec<GameEvent>) {
        self.state = RoundState::Evaluating;
        let expected = self.sequence.get(self.player_streak);

        if expected == Some(choice) {
            self.player_streak += 1;
            log::debug!("Correct ({}/{})", self.player_streak, self.sequence.len());
            events.push(GameEvent::Correct {
                streak: self.player_streak as u32,
            });

            if self.player_streak == self.sequence.len() {
                let round = self.sequence.score();
                log::info!("Round {} won", round);
                self.player_streak = 0;
                self.game_over = false;
                self.state = RoundState::Idle;
                events.push(GameEvent::RoundWon { round });
            } else {
                self.state = RoundState::AwaitingInput;
            }
        } else {
            let score = self.sequence.score();
            log::info!(
                "Incorrect: expected {:?}, got {}. Game over with score {}",
                expected.map(|c| c + 1),
                choice + 1,
                score
            );
            self.game_over = true;
            self.last_score = Some(score);
            self.player_streak = 0;
            self.sequence.clear();
            self.state = RoundState::Idle;
            events.push(GameEvent::GameOver { score });
        }
    }

    /// Put the machine mid-round, waiting on entry `streak` of `sequence`
    #[cfg(test)]
    pub(crate) fn force_awaiting(&mut self, sequence: Sequence, streak: usize) {
        self.sequence = sequence;
        self.player_streak = streak;
        self.state = RoundState::AwaitingInput;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sequence::testing::ScriptedSource;
    use crate::sim::sound::testing::RecordingSink;
    use proptest::prelude::*;

    fn timing() -> Timing {
        Timing {
            time_between_highlights: 1.0,
            time_between_rounds: 2.5,
        }
    }

    fn scripted(picks: &[u32]) -> RoundStateMachine {
        let generator = SequenceGenerator::new(Box::new(ScriptedSource::new(picks)), 4).unwrap();
        RoundStateMachine::new(generator, &timing())
    }

    fn seeded(seed: u64) -> RoundStateMachine {
        RoundStateMachine::new(SequenceGenerator::seeded(seed, 4).unwrap(), &timing())
    }

    /// Update until the player's turn
    fn play_through(machine: &mut RoundStateMachine, cubes: &mut CubeRegistry, sink: &mut RecordingSink) {
        for _ in 0..1000 {
            machine.update(0.25, None, cubes, sink);
            if machine.state() == RoundState::AwaitingInput {
                return;
            }
        }
        panic!("playback never finished");
    }

    /// Repeat the whole sequence back, one choice per frame
    fn repeat_sequence(machine: &mut RoundStateMachine, cubes: &mut CubeRegistry, sink: &mut RecordingSink) -> Vec<GameEvent> {
        let answer: Vec<u32> = machine.sequence().as_slice().to_vec();
        let mut events = Vec::new();
        for cube in answer {
            events.extend(machine.update(0.016, Some(cube), cubes, sink));
        }
        events
    }

    #[test]
    fn test_idle_starts_round_and_plays_first_step() {
        let mut machine = scripted(&[2]);
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        assert_eq!(machine.state(), RoundState::Idle);
        let events = machine.update(0.016, None, &mut cubes, &mut sink);
        assert_eq!(
            events,
            vec![
                GameEvent::RoundStarted { round: 1 },
                GameEvent::StepPlayed { position: 0, cube: 2 },
            ]
        );
        assert_eq!(machine.state(), RoundState::PlayingSequence);
        assert_eq!(cubes.active_index(), Some(2));
    }

    #[test]
    fn test_playback_finishes_into_awaiting_input() {
        let mut machine = scripted(&[0]);
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        machine.update(0.0, None, &mut cubes, &mut sink);
        let events = machine.update(1.0, None, &mut cubes, &mut sink);
        assert_eq!(events, vec![GameEvent::PlaybackFinished]);
        assert_eq!(machine.state(), RoundState::AwaitingInput);
        assert_eq!(cubes.active_index(), None);
        assert_eq!(machine.sequence_position(), 0);
        assert_eq!(machine.time_to_next_event(), 2.5);
    }

    #[test]
    fn test_round_gap_is_loaded_but_never_delays_next_round() {
        let timing = Timing {
            time_between_rounds: 7.0,
            ..timing()
        };
        let generator = SequenceGenerator::new(Box::new(ScriptedSource::new(&[3, 1])), 4).unwrap();
        let mut machine = RoundStateMachine::new(generator, &timing);
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        machine.update(0.0, None, &mut cubes, &mut sink);
        machine.update(1.0, None, &mut cubes, &mut sink);
        assert_eq!(machine.state(), RoundState::AwaitingInput);
        assert_eq!(machine.time_to_next_event(), 7.0);

        machine.update(0.016, Some(3), &mut cubes, &mut sink);
        let events = machine.update(0.016, None, &mut cubes, &mut sink);
        assert_eq!(events[0], GameEvent::RoundStarted { round: 2 });
        assert_eq!(events[1], GameEvent::StepPlayed { position: 0, cube: 3 });
    }

    #[test]
    fn test_no_choice_keeps_waiting() {
        let mut machine = scripted(&[0]);
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();
        machine.force_awaiting(Sequence::from(vec![1, 2]), 1);

        for _ in 0..10 {
            assert!(machine.update(1.0, None, &mut cubes, &mut sink).is_empty());
        }
        assert_eq!(machine.state(), RoundState::AwaitingInput);
        assert_eq!(machine.player_streak(), 1);
    }

    #[test]
    fn test_correct_choice_advances_streak() {
        let mut machine = scripted(&[0]);
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();
        machine.force_awaiting(Sequence::from(vec![2, 0, 1]), 1);

        let events = machine.update(0.016, Some(0), &mut cubes, &mut sink);
        assert_eq!(events, vec![GameEvent::Correct { streak: 2 }]);
        assert_eq!(machine.player_streak(), 2);
        assert_eq!(machine.state(), RoundState::AwaitingInput);
        assert!(!machine.game_over());
    }

    #[test]
    fn test_wrong_choice_ends_game() {
        let mut machine = scripted(&[0]);
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();
        machine.force_awaiting(Sequence::from(vec![2, 0, 1]), 1);

        let events = machine.update(0.016, Some(3), &mut cubes, &mut sink);
        assert_eq!(events, vec![GameEvent::GameOver { score: 3 }]);
        assert!(machine.game_over());
        assert!(machine.sequence().is_empty());
        assert_eq!(machine.player_streak(), 0);
        assert_eq!(machine.state(), RoundState::Idle);
        assert_eq!(machine.last_score(), Some(3));

        // Fresh game starts at length 1
        machine.update(0.016, None, &mut cubes, &mut sink);
        assert_eq!(machine.sequence().len(), 1);
    }

    #[test]
    fn test_win_extends_same_sequence() {
        let mut machine = scripted(&[1, 3]);
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        play_through(&mut machine, &mut cubes, &mut sink);
        assert_eq!(machine.sequence().as_slice(), &[1]);

        let events = machine.update(0.016, Some(1), &mut cubes, &mut sink);
        assert_eq!(
            events,
            vec![GameEvent::Correct { streak: 1 }, GameEvent::RoundWon { round: 1 }]
        );
        assert_eq!(machine.player_streak(), 0);
        assert_eq!(machine.state(), RoundState::Idle);

        machine.update(0.016, None, &mut cubes, &mut sink);
        assert_eq!(machine.sequence().as_slice(), &[1, 3]);
        assert_eq!(machine.state(), RoundState::PlayingSequence);
    }

    #[test]
    fn test_choice_outside_turn_is_dropped() {
        let mut machine = scripted(&[2, 2]);
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        machine.update(0.0, Some(2), &mut cubes, &mut sink);
        machine.update(0.5, Some(0), &mut cubes, &mut sink);
        assert_eq!(machine.state(), RoundState::PlayingSequence);
        assert_eq!(machine.player_streak(), 0);
        assert!(!machine.game_over());
    }

    #[test]
    fn test_game_over_flag_clears_on_next_win() {
        let mut machine = scripted(&[0, 1, 2]);
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        play_through(&mut machine, &mut cubes, &mut sink);
        machine.update(0.016, Some(3), &mut cubes, &mut sink);
        assert!(machine.game_over());

        play_through(&mut machine, &mut cubes, &mut sink);
        assert!(machine.game_over());
        repeat_sequence(&mut machine, &mut cubes, &mut sink);
        assert!(!machine.game_over());
        assert_eq!(machine.last_score(), Some(1));
    }

    #[test]
    fn test_determinism() {
        fn trace(seed: u64) -> Vec<(Option<u32>, RoundState)> {
            let mut machine = seeded(seed);
            let mut cubes = CubeRegistry::standard();
            let mut sink = RecordingSink::default();
            let mut out = Vec::new();
            let elapsed = [0.0, 0.3, 0.7, 1.0, 0.1, 2.0];
            for round in 0..4 {
                for dt in elapsed {
                    machine.update(dt, None, &mut cubes, &mut sink);
                    out.push((cubes.active_index(), machine.state()));
                }
                play_through(&mut machine, &mut cubes, &mut sink);
                if round < 3 {
                    repeat_sequence(&mut machine, &mut cubes, &mut sink);
                } else {
                    machine.update(0.016, Some(9), &mut cubes, &mut sink);
                }
                out.push((cubes.active_index(), machine.state()));
            }
            out
        }

        assert_eq!(trace(4242), trace(4242));
    }

    proptest! {
        #[test]
        fn prop_sequence_grows_by_one_per_won_round(seed in any::<u64>(), rounds in 1usize..12) {
            let mut machine = seeded(seed);
            let mut cubes = CubeRegistry::standard();
            let mut sink = RecordingSink::default();

            let mut previous: Vec<u32> = Vec::new();
            for k in 1..=rounds {
                play_through(&mut machine, &mut cubes, &mut sink);
                prop_assert_eq!(machine.sequence().len(), k);
                prop_assert_eq!(&machine.sequence().as_slice()[..k - 1], previous.as_slice());
                previous = machine.sequence().as_slice().to_vec();

                let events = repeat_sequence(&mut machine, &mut cubes, &mut sink);
                prop_assert_eq!(events.last(), Some(&GameEvent::RoundWon { round: k as u32 }));
                prop_assert_eq!(machine.sequence().len(), k);
            }
        }

        #[test]
        fn prop_wrong_pick_always_resets(seed in any::<u64>(), offset in 1u32..4) {
            let mut machine = seeded(seed);
            let mut cubes = CubeRegistry::standard();
            let mut sink = RecordingSink::default();

            play_through(&mut machine, &mut cubes, &mut sink);
            let expected = machine.sequence().get(0).unwrap();
            let wrong = (expected + offset) % 4;
            let events = machine.update(0.016, Some(wrong), &mut cubes, &mut sink);
            prop_assert_eq!(events, vec![GameEvent::GameOver { score: 1 }]);
            prop_assert!(machine.sequence().is_empty());
            prop_assert_eq!(machine.player_streak(), 0);
        }
    }
}
