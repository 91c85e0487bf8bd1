//! Session driver
//!
//! `App` owns the engine, the leaderboard and the current [`Screen`], and
//! moves between screens in a flat loop: menu, play, name entry, game over,
//! and back. It knows nothing about drawing; the renderer reads it.

pub mod screen;

use crossterm::event::KeyEvent;
use log::info;
use rand::Rng;
use rand::rngs::StdRng;
use std::time::Instant;

use crate::game::{Difficulty, Direction, GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction, TextAction};
use crate::leaderboard::{Leaderboard, sanitize_name};
use crate::metrics::GameMetrics;

pub use screen::{MenuItem, Screen};

/// Most characters accepted in the name prompt before sanitising
pub const NAME_INPUT_LIMIT: usize = 32;

pub struct App<R = StdRng> {
    screen: Screen,
    engine: GameEngine<R>,
    leaderboard: Leaderboard,
    metrics: GameMetrics,
    input: InputHandler,
    should_quit: bool,
}

impl App<StdRng> {
    pub fn new(config: GameConfig, leaderboard: Leaderboard) -> Self {
        Self::with_engine(GameEngine::new(config), leaderboard)
    }
}

impl<R: Rng> App<R> {
    pub fn with_engine(engine: GameEngine<R>, leaderboard: Leaderboard) -> Self {
        Self {
            screen: Screen::menu(),
            engine,
            leaderboard,
            metrics: GameMetrics::new(),
            input: InputHandler::new(),
            should_quit: false,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn engine(&self) -> &GameEngine<R> {
        &self.engine
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Advance time: refreshes the clock and steps the game when due
    pub fn update(&mut self, now: Instant) {
        self.metrics.update();

        if self.screen != Screen::Playing {
            return;
        }
        if let Some(outcome) = self.engine.tick(now) {
            if outcome.ended.is_some() {
                self.finish_game();
            }
        }
    }

    /// Route one key press to the current screen
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if let Screen::NameEntry { .. } = self.screen {
            let action = self.input.handle_text_event(key);
            self.on_name_entry(action);
            return;
        }

        let action = self.input.handle_key_event(key);
        if action == KeyAction::ForceQuit {
            self.should_quit = true;
            return;
        }

        match self.screen.clone() {
            Screen::Menu { selected } => self.on_menu(selected, action, now),
            Screen::Difficulty { selected } => self.on_difficulty(selected, action),
            Screen::Leaderboard => self.screen = Screen::Menu {
                selected: MenuItem::Leaderboards,
            },
            Screen::Playing => self.on_playing(action, now),
            Screen::GameOver { .. } => self.on_game_over(action, now),
            Screen::NameEntry { .. } => {}
        }
    }

    fn on_menu(&mut self, selected: MenuItem, action: KeyAction, now: Instant) {
        match action {
            KeyAction::Move(Direction::Up) => {
                self.screen = Screen::Menu {
                    selected: selected.previous(),
                }
            }
            KeyAction::Move(Direction::Down) => {
                self.screen = Screen::Menu {
                    selected: selected.next(),
                }
            }
            KeyAction::Confirm => self.activate(selected, now),
            KeyAction::Quit => self.should_quit = true,
            _ => {}
        }
    }

    fn activate(&mut self, item: MenuItem, now: Instant) {
        match item {
            MenuItem::StartGame => self.start_game(now),
            MenuItem::ChangeDifficulty => {
                self.screen = Screen::Difficulty {
                    selected: self.engine.difficulty(),
                }
            }
            MenuItem::Leaderboards => {
                self.leaderboard.load();
                self.screen = Screen::Leaderboard;
            }
            MenuItem::Quit => self.should_quit = true,
        }
    }

    fn on_difficulty(&mut self, selected: Difficulty, action: KeyAction) {
        match action {
            KeyAction::Move(Direction::Left) => {
                self.screen = Screen::Difficulty {
                    selected: selected.previous(),
                }
            }
            KeyAction::Move(Direction::Right) => {
                self.screen = Screen::Difficulty {
                    selected: selected.next(),
                }
            }
            KeyAction::Confirm => {
                self.engine.set_difficulty(selected);
                info!("difficulty set to {}", selected);
                self.screen = Screen::Menu {
                    selected: MenuItem::ChangeDifficulty,
                };
            }
            KeyAction::Back => {
                self.screen = Screen::Menu {
                    selected: MenuItem::ChangeDifficulty,
                }
            }
            _ => {}
        }
    }

    fn on_playing(&mut self, action: KeyAction, now: Instant) {
        match action {
            KeyAction::Move(direction) => self.engine.steer(direction),
            KeyAction::Pause => {
                self.engine.toggle_pause(now);
                self.metrics.on_pause_changed(self.engine.is_paused());
            }
            KeyAction::Quit | KeyAction::Back => {
                self.engine.abandon();
                self.finish_game();
            }
            _ => {}
        }
    }

    fn on_name_entry(&mut self, action: TextAction) {
        let Screen::NameEntry { input } = &mut self.screen else {
            return;
        };

        match action {
            TextAction::Insert(c) => {
                if input.chars().count() < NAME_INPUT_LIMIT {
                    input.push(c);
                }
            }
            TextAction::Backspace => {
                input.pop();
            }
            TextAction::Submit => {
                let typed = std::mem::take(input);
                let score = i64::from(self.engine.score());
                let rank = self.leaderboard.add(&typed, score);
                self.screen = Screen::GameOver {
                    name: sanitize_name(&typed),
                    rank,
                };
            }
            TextAction::ForceQuit => self.should_quit = true,
            TextAction::None => {}
        }
    }

    fn on_game_over(&mut self, action: KeyAction, now: Instant) {
        match action {
            KeyAction::Restart => self.start_game(now),
            KeyAction::Menu | KeyAction::Back => self.screen = Screen::menu(),
            KeyAction::Quit => self.should_quit = true,
            _ => {}
        }
    }

    fn start_game(&mut self, now: Instant) {
        self.engine.play(now);
        self.metrics.on_game_start();
        self.screen = Screen::Playing;
    }

    fn finish_game(&mut self) {
        self.metrics.on_game_over(self.engine.score());
        self.screen = Screen::NameEntry {
            input: String::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EndCause, GamePhase};
    use crate::leaderboard::ScoreEntry;
    use crossterm::event::{KeyCode, KeyModifiers};
    use rand::SeedableRng;
    use std::time::Duration;
    use tempfile::TempDir;

    fn app(dir: &TempDir) -> App<StdRng> {
        let engine = GameEngine::with_rng(GameConfig::new(20, 30), StdRng::seed_from_u64(5));
        let leaderboard = Leaderboard::open(dir.path().join("leaderboard.txt"));
        App::with_engine(engine, leaderboard)
    }

    fn key(app: &mut App<StdRng>, code: KeyCode, now: Instant) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now);
    }

    fn type_name(app: &mut App<StdRng>, name: &str, now: Instant) {
        for c in name.chars() {
            key(app, KeyCode::Char(c), now);
        }
    }

    #[test]
    fn test_starts_on_menu() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        assert_eq!(*app.screen(), Screen::menu());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let now = Instant::now();

        key(&mut app, KeyCode::Up, now);
        assert_eq!(
            *app.screen(),
            Screen::Menu {
                selected: MenuItem::Quit
            }
        );
        key(&mut app, KeyCode::Down, now);
        key(&mut app, KeyCode::Down, now);
        assert_eq!(
            *app.screen(),
            Screen::Menu {
                selected: MenuItem::ChangeDifficulty
            }
        );
    }

    #[test]
    fn test_menu_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        key(&mut app, KeyCode::Char('q'), Instant::now());
        assert!(app.should_quit());
    }

    #[test]
    fn test_change_difficulty() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let now = Instant::now();

        key(&mut app, KeyCode::Down, now);
        key(&mut app, KeyCode::Enter, now);
        assert_eq!(
            *app.screen(),
            Screen::Difficulty {
                selected: Difficulty::Normal
            }
        );

        key(&mut app, KeyCode::Right, now);
        key(&mut app, KeyCode::Enter, now);
        assert_eq!(app.engine().difficulty(), Difficulty::Hard);

        // Esc leaves without applying
        key(&mut app, KeyCode::Enter, now);
        key(&mut app, KeyCode::Right, now);
        key(&mut app, KeyCode::Esc, now);
        assert_eq!(app.engine().difficulty(), Difficulty::Hard);
        assert!(matches!(app.screen(), Screen::Menu { .. }));
    }

    #[test]
    fn test_leaderboard_screen_reloads_and_returns() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let now = Instant::now();
        std::fs::write(dir.path().join("leaderboard.txt"), "\"zed\" 4\n").unwrap();

        key(&mut app, KeyCode::Down, now);
        key(&mut app, KeyCode::Down, now);
        key(&mut app, KeyCode::Enter, now);
        assert_eq!(*app.screen(), Screen::Leaderboard);
        assert_eq!(app.leaderboard().all(), &[ScoreEntry::new("zed", 4)]);

        key(&mut app, KeyCode::Char('x'), now);
        assert!(matches!(app.screen(), Screen::Menu { .. }));
    }

    #[test]
    fn test_full_round_through_game_over() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let t0 = Instant::now();

        key(&mut app, KeyCode::Enter, t0);
        assert_eq!(*app.screen(), Screen::Playing);
        assert!(app.engine().is_running());

        // steer into the top wall: 10 rows up, the 11th step leaves the grid
        key(&mut app, KeyCode::Up, t0);
        let mut now = t0;
        for _ in 0..11 {
            now += Duration::from_secs(1);
            app.update(now);
        }
        assert_eq!(
            app.engine().phase(),
            GamePhase::Ended(EndCause::OutOfBounds)
        );
        assert_eq!(
            *app.screen(),
            Screen::NameEntry {
                input: String::new()
            }
        );
        assert_eq!(app.metrics().games_played, 1);

        // 'q' is text here, not quit
        type_name(&mut app, "q Al!ice", now);
        key(&mut app, KeyCode::Backspace, now);
        key(&mut app, KeyCode::Enter, now);

        let score = i64::from(app.engine().score());
        assert_eq!(
            *app.screen(),
            Screen::GameOver {
                name: "qAlic".to_string(),
                rank: Some(1)
            }
        );
        assert_eq!(app.leaderboard().all(), &[ScoreEntry::new("qAlic", score)]);
        assert!(!app.should_quit());

        key(&mut app, KeyCode::Char('r'), now);
        assert_eq!(*app.screen(), Screen::Playing);
        assert_eq!(app.engine().score(), 0);
    }

    #[test]
    fn test_quit_during_play_goes_to_name_entry() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let now = Instant::now();

        key(&mut app, KeyCode::Enter, now);
        key(&mut app, KeyCode::Char('q'), now);

        assert_eq!(app.engine().end_cause(), Some(EndCause::Abandoned));
        assert!(matches!(app.screen(), Screen::NameEntry { .. }));
        assert!(!app.should_quit());

        key(&mut app, KeyCode::Enter, now);
        assert_eq!(
            *app.screen(),
            Screen::GameOver {
                name: "Player".to_string(),
                rank: Some(1)
            }
        );

        key(&mut app, KeyCode::Char('m'), now);
        assert_eq!(*app.screen(), Screen::menu());
    }

    #[test]
    fn test_quick_turns_cannot_reverse_between_steps() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let t0 = Instant::now();

        key(&mut app, KeyCode::Enter, t0);
        key(&mut app, KeyCode::Up, t0);
        key(&mut app, KeyCode::Left, t0);
        app.update(t0 + Duration::from_secs(1));

        assert!(app.engine().is_running());
        assert_eq!(app.engine().snake().direction(), Direction::Right);
        assert_eq!(*app.screen(), Screen::Playing);
    }

    #[test]
    fn test_pause_stops_updates() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let t0 = Instant::now();

        key(&mut app, KeyCode::Enter, t0);
        let head = app.engine().snake().head();
        key(&mut app, KeyCode::Char('p'), t0);
        assert!(app.engine().is_paused());

        app.update(t0 + Duration::from_secs(3));
        assert_eq!(app.engine().snake().head(), head);

        let resume = t0 + Duration::from_secs(3);
        key(&mut app, KeyCode::Char('p'), resume);
        app.update(resume + Duration::from_secs(1));
        assert_eq!(
            app.engine().snake().head(),
            head.moved_in_direction(Direction::Right)
        );
    }

    #[test]
    fn test_name_input_is_capped() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let now = Instant::now();

        key(&mut app, KeyCode::Enter, now);
        key(&mut app, KeyCode::Esc, now);
        type_name(&mut app, &"x".repeat(40), now);

        match app.screen() {
            Screen::NameEntry { input } => assert_eq!(input.len(), NAME_INPUT_LIMIT),
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        let now = Instant::now();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        key(&mut app, KeyCode::Enter, now);
        key(&mut app, KeyCode::Esc, now);
        app.handle_key(ctrl_c, now);

        assert!(app.should_quit());
    }
}
