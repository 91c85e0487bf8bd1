//! Snake Terra - terminal Snake with difficulty levels and a persistent leaderboard
//!
//! This library provides:
//! - Core game logic (game module)
//! - The on-disk high-score table (leaderboard module)
//! - Screen flow for menu, play, name entry and game over (app module)
//! - TUI rendering and the terminal event loop (render and modes modules)

pub mod app;
pub mod config;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
