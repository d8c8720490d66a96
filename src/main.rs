//! Musical Bloom entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use musical_bloom::app::{MenuItem, Mode};
    use musical_bloom::audio::{AudioManager, Cue};
    use musical_bloom::consts::MAX_FRAME_DT;
    use musical_bloom::renderer::RenderState;
    use musical_bloom::sim::{GameEvent, Key, KeyAction, KeyEvent, MusicalBloom, RoundState};
    use musical_bloom::{BloomApp, HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        app: BloomApp,
        audio: AudioManager,
        settings: Settings,
        render_state: Option<RenderState>,
        last_time: f64,
        start_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(app: BloomApp, settings: Settings) -> Self {
            Self {
                app,
                audio: AudioManager::new(&settings),
                settings,
                render_state: None,
                last_time: 0.0,
                start_time: js_sys::Date::now(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance the game and react to what happened
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DT);
            let events = self.app.update(dt, js_sys::Date::now(), &mut self.audio);

            for event in events {
                match event {
                    GameEvent::RoundWon { .. } => self.audio.play_cue(Cue::RoundWon),
                    GameEvent::GameOver { .. } => {
                        if self.app.last_rank().is_some() {
                            self.audio.play_cue(Cue::HighScore);
                        } else {
                            self.audio.play_cue(Cue::GameOver);
                        }
                    }
                    _ => {}
                }
            }

            if self.app.take_scores_changed() {
                self.app.high_scores().save();
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let seconds = ((time - self.start_time) / 1000.0) as f32;
            let cubes = self.app.game().cubes();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(cubes, seconds) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let game = self.app.game();

            set_text(&document, "#hud-round .hud-value", &game.round().to_string());
            set_text(
                &document,
                "#hud-streak .hud-value",
                &format!("{}/{}", game.player_streak(), game.sequence().len()),
            );
            set_text(
                &document,
                "#hud-last .hud-value",
                &game.last_score().map_or("-".to_string(), |s| s.to_string()),
            );
            set_text(
                &document,
                "#hud-best .hud-value",
                &self
                    .app
                    .high_scores()
                    .top_score()
                    .map_or("-".to_string(), |s| s.to_string()),
            );

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    set_text(&document, "#hud-fps .hud-value", &self.fps.to_string());
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            let status = match game.state() {
                _ if game.game_over() && game.sequence().len() <= 1 => "Game over - watch again",
                RoundState::Idle | RoundState::PlayingSequence => "Listen...",
                RoundState::AwaitingInput | RoundState::Evaluating => "Your turn: keys 1-4",
            };
            if let Some(el) = document.get_element_by_id("status") {
                el.set_text_content(Some(status));
            }

            // Show/hide pause menu and mark the selected entry
            if let Some(el) = document.get_element_by_id("pause-menu") {
                match self.app.mode() {
                    Mode::Paused(menu) => {
                        let _ = el.set_attribute("class", "");
                        for (i, item) in menu.items().iter().enumerate() {
                            let id = match item {
                                MenuItem::Resume => "resume-btn",
                                MenuItem::Quit => "quit-btn",
                                MenuItem::Label(_) => continue,
                            };
                            if let Some(btn) = document.get_element_by_id(id) {
                                let class = if i == menu.selected() { "selected" } else { "" };
                                let _ = btn.set_attribute("class", class);
                            }
                        }
                    }
                    _ => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("quit-screen") {
                let class = if self.app.has_quit() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Musical Bloom starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let session = MusicalBloom::seeded(seed, &settings.timing)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let app = BloomApp::new(session, HighScores::load());
        let game = Rc::new(RefCell::new(Game::new(app, settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let cubes = game.borrow().app.game().cubes().clone();
        let render_state = RenderState::new(surface, &adapter, width, height, &cubes)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, game.clone());
        setup_pause_menu(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Musical Bloom running!");
        Ok(())
    }

    fn key_event(event: &KeyboardEvent, action: KeyAction) -> KeyEvent {
        KeyEvent {
            key: Key::from_key_str(&event.key()),
            action,
            repeat: event.repeat(),
        }
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        for (name, action) in [("keydown", KeyAction::Down), ("keyup", KeyAction::Up)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut guard = game.borrow_mut();
                let g = &mut *guard;
                // Browsers only allow audio after a user gesture
                g.audio.resume();
                if g.app.handle_key(&key_event(&event, action), &mut g.audio) {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();

            if g.app.has_quit() {
                log::info!("Stopped");
                return;
            }
        }

        request_animation_frame(game);
    }

    fn setup_pause_menu(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, item) in [("resume-btn", MenuItem::Resume), ("quit-btn", MenuItem::Quit)] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().app.activate(item);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.app.is_playing() {
                        g.app.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.app.is_playing() {
                    g.app.pause();
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus restores the configured mute state
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

/// Headless build: an auto-player runs one scripted game and logs it
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec3;

    use musical_bloom::consts::MAX_FRAME_DT;
    use musical_bloom::sim::{
        GameEvent, Key, KeyEvent, MusicalBloom, Note, PlayMode, RoundState, SoundSink,
    };
    use musical_bloom::{BloomApp, HighScores, Result, Settings};

    /// Headless Musical Bloom: an auto-player repeats the sequence, then slips
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    pub struct Cli {
        /// Rounds the auto-player wins before it presses a wrong cube
        #[arg(default_value_t = 5)]
        pub rounds: u32,
        /// Settings JSON file; stored settings are used when absent
        #[arg(short, long, env = "MUSICAL_BLOOM_SETTINGS")]
        pub settings: Option<PathBuf>,
    }
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Upper bound on simulated frames
    const MAX_FRAMES: u32 = 1_000_000;

    /// Logs each note instead of playing it
    struct LogSink;

    impl SoundSink for LogSink {
        fn play(&mut self, note: Note, position: Vec3, _gain: f32, _mode: PlayMode) {
            log::info!("  ♪ {} (x = {:+.1})", note.as_str(), position.x);
        }
    }

    fn now_ms() -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
        match path {
            Some(path) => {
                log::info!("Loading settings from {}", path.display());
                Settings::from_json_file(path)
            }
            None => Ok(Settings::load()),
        }
    }

    /// Cube the auto-player presses next, if it is its turn
    fn next_press(game: &MusicalBloom, rounds_to_win: u32) -> Option<u32> {
        if game.state() != RoundState::AwaitingInput {
            return None;
        }
        let expected = game.sequence().get(game.player_streak())?;
        if game.round() > rounds_to_win {
            // Deliberate slip on the next cube over
            Some((expected + 1) % game.cubes().len() as u32)
        } else {
            Some(expected)
        }
    }

    pub fn run(cli: &Cli) -> Result<()> {
        let rounds_to_win = cli.rounds;
        let settings = load_settings(cli.settings.as_ref())?;
        let seed = settings.seed.unwrap_or_else(|| now_ms() as u64);
        let game = MusicalBloom::seeded(seed, &settings.timing)?;
        let mut app = BloomApp::new(game, HighScores::load());
        let mut sink = LogSink;

        log::info!("Auto-player will win {} rounds, then slip", rounds_to_win);

        for _ in 0..MAX_FRAMES {
            if let Some(cube) = next_press(app.game(), rounds_to_win) {
                let key = Key::Digit(cube as u8 + 1);
                log::info!("Auto-player presses {}", cube + 1);
                app.handle_key(&KeyEvent::down(key), &mut sink);
                app.handle_key(&KeyEvent::up(key), &mut sink);
            }

            for event in app.update(FRAME_DT.min(MAX_FRAME_DT), now_ms(), &mut sink) {
                match event {
                    GameEvent::RoundStarted { round } => log::info!("Round {}", round),
                    GameEvent::RoundWon { round } => log::info!("Round {} repeated correctly", round),
                    GameEvent::GameOver { score } => {
                        println!("Game over: reached a sequence of {} (seed {})", score, seed);
                        if let Some(rank) = app.last_rank() {
                            println!("High score rank #{}", rank);
                        }
                        app.high_scores().save();
                        return Ok(());
                    }
                    _ => {}
                }
            }
        }

        log::warn!("Demo stopped after {} frames", MAX_FRAMES);
        Ok(())
    }


}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let cli = demo::Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Musical Bloom (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    if let Err(e) = demo::run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
