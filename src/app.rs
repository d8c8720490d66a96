//! Top-level mode dispatch
//!
//! Key events go either to the running game or to the pause overlay. The game
//! only advances while it is being played, and finished games are offered to
//! the leaderboard.

use crate::highscores::HighScores;
use crate::sim::{GameEvent, InputResponse, Key, KeyAction, KeyEvent, MusicalBloom, SoundSink};

/// An entry of the pause overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Static text, never selectable
    Label(&'static str),
    Resume,
    Quit,
}

impl MenuItem {
    pub fn text(self) -> &'static str {
        match self {
            MenuItem::Label(text) => text,
            MenuItem::Resume => "RESUME",
            MenuItem::Quit => "QUIT",
        }
    }

    pub fn is_selectable(self) -> bool {
        !matches!(self, MenuItem::Label(_))
    }
}

/// Pause overlay contents, top to bottom
pub const PAUSE_MENU: [MenuItem; 3] = [MenuItem::Label("PAUSED"), MenuItem::Resume, MenuItem::Quit];

/// Pause overlay selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseMenu {
    selected: usize,
}

impl Default for PauseMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl PauseMenu {
    /// Opens with RESUME selected
    pub fn new() -> Self {
        Self { selected: 1 }
    }

    pub fn items(&self) -> &'static [MenuItem] {
        &PAUSE_MENU
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> MenuItem {
        PAUSE_MENU[self.selected]
    }

    /// Select the previous selectable item; stays put at the top
    pub fn move_up(&mut self) {
        if let Some(i) = (0..self.selected)
            .rev()
            .find(|&i| PAUSE_MENU[i].is_selectable())
        {
            self.selected = i;
        }
    }

    /// Select the next selectable item; stays put at the bottom
    pub fn move_down(&mut self) {
        if let Some(i) = (self.selected + 1..PAUSE_MENU.len()).find(|&i| PAUSE_MENU[i].is_selectable()) {
            self.selected = i;
        }
    }
}

/// What the application is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Playing,
    Paused(PauseMenu),
    /// Player chose QUIT; nothing advances any more
    Quit,
}

/// The game plus its pause overlay and leaderboard
pub struct BloomApp {
    game: MusicalBloom,
    mode: Mode,
    high_scores: HighScores,
    /// Leaderboard changed since the last [`BloomApp::take_scores_changed`]
    scores_changed: bool,
    /// Rank of the most recent qualifying game
    last_rank: Option<usize>,
}

impl BloomApp {
    pub fn new(game: MusicalBloom, high_scores: HighScores) -> Self {
        Self {
            game,
            mode: Mode::Playing,
            high_scores,
            scores_changed: false,
            last_rank: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn game(&self) -> &MusicalBloom {
        &self.game
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn is_playing(&self) -> bool {
        self.mode == Mode::Playing
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.mode, Mode::Paused(_))
    }

    pub fn has_quit(&self) -> bool {
        self.mode == Mode::Quit
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// True once after each leaderboard change (caller persists it)
    pub fn take_scores_changed(&mut self) -> bool {
        std::mem::take(&mut self.scores_changed)
    }

    /// Open the pause overlay; no-op unless playing
    pub fn pause(&mut self) {
        if self.mode == Mode::Playing {
            self.game.release_held_key();
            self.mode = Mode::Paused(PauseMenu::new());
            log::info!("Paused");
        }
    }

    /// Close the pause overlay; no-op unless paused
    pub fn resume(&mut self) {
        if self.is_paused() {
            self.mode = Mode::Playing;
            log::info!("Resumed");
        }
    }

    pub fn quit(&mut self) {
        if self.mode != Mode::Quit {
            self.mode = Mode::Quit;
            log::info!("Quit requested");
        }
    }

    /// Carry out a pause menu entry
    pub fn activate(&mut self, item: MenuItem) {
        match item {
            MenuItem::Resume => self.resume(),
            MenuItem::Quit => self.quit(),
            MenuItem::Label(_) => {}
        }
    }

    /// Route a key event; returns true if it was consumed
    pub fn handle_key(&mut self, event: &KeyEvent, sink: &mut dyn SoundSink) -> bool {
        match self.mode {
            Mode::Playing => match self.game.handle_key(event, sink) {
                InputResponse::PauseRequested => {
                    self.pause();
                    true
                }
                InputResponse::Handled => true,
                InputResponse::Ignored => false,
            },
            Mode::Paused(mut menu) => {
                let consumed = match (event.key, event.action) {
                    (Key::ArrowUp, KeyAction::Down) => {
                        menu.move_up();
                        true
                    }
                    (Key::ArrowDown, KeyAction::Down) => {
                        menu.move_down();
                        true
                    }
                    (Key::Enter, KeyAction::Down) if !event.repeat => {
                        self.mode = Mode::Paused(menu);
                        self.activate(menu.selected_item());
                        return true;
                    }
                    // Escape acts on key-up in both modes
                    (Key::Escape, KeyAction::Up) => {
                        self.resume();
                        return true;
                    }
                    _ => false,
                };
                self.mode = Mode::Paused(menu);
                consumed
            }
            Mode::Quit => false,
        }
    }

    /// Advance the game by `elapsed` seconds; `timestamp` (ms) stamps new high scores
    pub fn update(&mut self, elapsed: f32, timestamp: f64, sink: &mut dyn SoundSink) -> Vec<GameEvent> {
        if self.mode != Mode::Playing {
            return Vec::new();
        }

        let events = self.game.update(elapsed, sink);
        for event in &events {
            if let GameEvent::GameOver { score } = *event {
                self.last_rank = self.high_scores.add_score(score, timestamp);
                if let Some(rank) = self.last_rank {
                    log::info!("New high score #{}: {}", rank, score);
                    self.scores_changed = true;
                }
            }
        }
        events
    }
}
