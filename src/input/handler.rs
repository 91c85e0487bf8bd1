use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// What a key means on menus and during play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Arrow keys and WASD; also menu navigation
    Move(Direction),
    Confirm,
    Back,
    Pause,
    Restart,
    Menu,
    Quit,
    /// Ctrl+C: leave the program from any screen
    ForceQuit,
    None,
}

/// What a key means while typing a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAction {
    Insert(char),
    Backspace,
    Submit,
    ForceQuit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if is_ctrl_c(&key) {
            return KeyAction::ForceQuit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Move(Direction::Up),
            KeyCode::Down => KeyAction::Move(Direction::Down),
            KeyCode::Left => KeyAction::Move(Direction::Left),
            KeyCode::Right => KeyAction::Move(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Move(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Move(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Move(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Move(Direction::Right),

            // Controls
            KeyCode::Enter => KeyAction::Confirm,
            KeyCode::Esc => KeyAction::Back,
            KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Pause,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
            KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::Menu,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }

    pub fn handle_text_event(&self, key: KeyEvent) -> TextAction {
        if is_ctrl_c(&key) {
            return TextAction::ForceQuit;
        }

        match key.code {
            KeyCode::Enter => TextAction::Submit,
            KeyCode::Backspace => TextAction::Backspace,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                TextAction::Insert(c)
            }
            _ => TextAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}
