//! Key events to player choices
//!
//! Key-down lights the cube and plays its note as feedback; key-up commits
//! the cube as this frame's choice. Only the choice is seen by the round logic.

use super::cubes::CubeRegistry;
use super::sound::SoundSink;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Number row key `1`..`9`
    Digit(u8),
    Escape,
    Enter,
    ArrowUp,
    ArrowDown,
    Other,
}

impl Key {
    /// Map a browser `KeyboardEvent.key` string
    pub fn from_key_str(s: &str) -> Self {
        match s {
            "Escape" => Key::Escape,
            "Enter" | " " => Key::Enter,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            _ => match s.as_bytes() {
                [d @ b'1'..=b'9'] => Key::Digit(*d - b'0'),
                _ => Key::Other,
            },
        }
    }

    /// Cube selected by this key (`1` is cube 0)
    pub fn cube_index(self) -> Option<u32> {
        match self {
            Key::Digit(d) if d >= 1 => Some(u32::from(d) - 1),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A discrete key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
    /// Generated by keyboard auto-repeat
    pub repeat: bool,
}

impl KeyEvent {
    pub fn down(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Down,
            repeat: false,
        }
    }

    pub fn up(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Up,
            repeat: false,
        }
    }

    pub fn repeat(key: Key) -> Self {
        Self {
            key,
            action: KeyAction::Down,
            repeat: true,
        }
    }
}

/// How an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResponse {
    Handled,
    Ignored,
    /// Player asked for the pause overlay (always honoured)
    PauseRequested,
}

/// Holds at most one pending player choice per frame
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    pending_choice: Option<u32>,
    /// Cube lit by a key that is still down
    held: Option<u32>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_choice(&self) -> Option<u32> {
        self.pending_choice
    }

    /// Hand the pending choice to the round logic and clear the slot
    pub fn take_choice(&mut self) -> Option<u32> {
        self.pending_choice.take()
    }

    pub fn held(&self) -> Option<u32> {
        self.held
    }

    /// Unlight the cube under a held key without recording a choice.
    ///
    /// Cubes lit by sequence playback are left alone.
    pub fn release_held(&mut self, cubes: &mut CubeRegistry) {
        if let Some(cube) = self.held.take() {
            log::debug!("Released held key {}", cube + 1);
            if let Err(e) = cubes.deactivate(cube) {
                log::warn!("{}", e);
            }
        }
    }

    /// Process one key event.
    ///
    /// `playback_active` blocks every gameplay key; the pause request still
    /// goes through.
    pub fn handle_event(
        &mut self,
        event: &KeyEvent,
        playback_active: bool,
        cubes: &mut CubeRegistry,
        sink: &mut dyn SoundSink,
    ) -> InputResponse {
        if event.action == KeyAction::Down && event.repeat {
            return InputResponse::Ignored;
        }

        if event.action == KeyAction::Up && event.key == Key::Escape {
            return InputResponse::PauseRequested;
        }

        if playback_active {
            return InputResponse::Ignored;
        }

        let Some(cube) = event.key.cube_index() else {
            return InputResponse::Ignored;
        };
        if cube as usize >= cubes.len() {
            return InputResponse::Ignored;
        }

        match event.action {
            KeyAction::Down => {
                log::debug!("Player pressed {}", cube + 1);
                if let Some(previous) = self.held.replace(cube).filter(|&p| p != cube) {
                    let _ = cubes.deactivate(previous);
                }
                if let Err(e) = cubes.activate(cube) {
                    log::warn!("{}", e);
                }
                if let Err(e) = cubes.play_sound(cube, sink) {
                    log::warn!("{}", e);
                }
            }
            KeyAction::Up => {
                if self.held == Some(cube) {
                    self.held = None;
                }
                if let Some(previous) = self.pending_choice.replace(cube) {
                    log::debug!("Choice {} replaced by {}", previous + 1, cube + 1);
                }
                if let Err(e) = cubes.deactivate(cube) {
                    log::warn!("{}", e);
                }
            }
        }
        InputResponse::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sound::Note;
    use crate::sim::sound::testing::RecordingSink;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_key_str("1"), Key::Digit(1));
        assert_eq!(Key::from_key_str("4"), Key::Digit(4));
        assert_eq!(Key::from_key_str("0"), Key::Other);
        assert_eq!(Key::from_key_str("12"), Key::Other);
        assert_eq!(Key::from_key_str("Escape"), Key::Escape);
        assert_eq!(Key::Digit(1).cube_index(), Some(0));
        assert_eq!(Key::Escape.cube_index(), None);
    }

    #[test]
    fn test_press_and_release() {
        let mut tracker = InputTracker::new();
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        let r = tracker.handle_event(&KeyEvent::down(Key::Digit(2)), false, &mut cubes, &mut sink);
        assert_eq!(r, InputResponse::Handled);
        assert_eq!(cubes.active_index(), Some(1));
        assert_eq!(sink.played, vec![Note::C]);
        assert_eq!(tracker.pending_choice(), None);

        let r = tracker.handle_event(&KeyEvent::up(Key::Digit(2)), false, &mut cubes, &mut sink);
        assert_eq!(r, InputResponse::Handled);
        assert_eq!(cubes.active_index(), None);
        assert_eq!(tracker.take_choice(), Some(1));
        assert_eq!(tracker.take_choice(), None);
    }

    #[test]
    fn test_repeat_is_ignored() {
        let mut tracker = InputTracker::new();
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        tracker.handle_event(&KeyEvent::down(Key::Digit(3)), false, &mut cubes, &mut sink);
        for _ in 0..5 {
            let r = tracker.handle_event(&KeyEvent::repeat(Key::Digit(3)), false, &mut cubes, &mut sink);
            assert_eq!(r, InputResponse::Ignored);
        }
        assert_eq!(sink.played.len(), 1);
        assert_eq!(tracker.pending_choice(), None);
    }

    #[test]
    fn test_playback_blocks_gameplay_keys_but_not_pause() {
        let mut tracker = InputTracker::new();
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        let r = tracker.handle_event(&KeyEvent::down(Key::Digit(1)), true, &mut cubes, &mut sink);
        assert_eq!(r, InputResponse::Ignored);
        let r = tracker.handle_event(&KeyEvent::up(Key::Digit(1)), true, &mut cubes, &mut sink);
        assert_eq!(r, InputResponse::Ignored);
        assert!(sink.played.is_empty());
        assert_eq!(tracker.pending_choice(), None);

        let r = tracker.handle_event(&KeyEvent::up(Key::Escape), true, &mut cubes, &mut sink);
        assert_eq!(r, InputResponse::PauseRequested);
    }

    #[test]
    fn test_release_held_only_touches_pressed_cube() {
        let mut tracker = InputTracker::new();
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        cubes.activate(0).unwrap();
        tracker.handle_event(&KeyEvent::down(Key::Digit(3)), false, &mut cubes, &mut sink);
        assert_eq!(tracker.held(), Some(2));

        tracker.release_held(&mut cubes);
        assert_eq!(tracker.held(), None);
        assert!(!cubes.cubes()[2].active);
        assert!(cubes.cubes()[0].active);
        assert_eq!(tracker.pending_choice(), None);

        // Nothing held: a no-op
        tracker.release_held(&mut cubes);
        assert_eq!(cubes.active_index(), Some(0));
    }

    #[test]
    fn test_key_up_clears_held() {
        let mut tracker = InputTracker::new();
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        tracker.handle_event(&KeyEvent::down(Key::Digit(1)), false, &mut cubes, &mut sink);
        tracker.handle_event(&KeyEvent::up(Key::Digit(1)), false, &mut cubes, &mut sink);
        assert_eq!(tracker.held(), None);
    }

    #[test]
    fn test_last_release_wins() {
        let mut tracker = InputTracker::new();
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        tracker.handle_event(&KeyEvent::up(Key::Digit(1)), false, &mut cubes, &mut sink);
        tracker.handle_event(&KeyEvent::up(Key::Digit(4)), false, &mut cubes, &mut sink);
        assert_eq!(tracker.take_choice(), Some(3));
    }

    #[test]
    fn test_keys_beyond_registry_ignored() {
        let mut tracker = InputTracker::new();
        let mut cubes = CubeRegistry::standard();
        let mut sink = RecordingSink::default();

        let r = tracker.handle_event(&KeyEvent::up(Key::Digit(5)), false, &mut cubes, &mut sink);
        assert_eq!(r, InputResponse::Ignored);
        assert_eq!(tracker.pending_choice(), None);
    }
}
