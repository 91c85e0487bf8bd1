//! Core game logic for Snake
//!
//! No terminal I/O lives here. Game time only advances through the
//! `Instant`s callers hand to the engine, so tests drive it without sleeping.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{Difficulty, GameConfig};
pub use engine::{EndCause, GameEngine, GamePhase, StepOutcome};
pub use food::Food;
pub use state::{INITIAL_SNAKE_LENGTH, Point, Snake};
