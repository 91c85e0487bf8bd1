use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Named speed preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Tick interval at score zero, in milliseconds
    pub fn base_interval_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 220,
            Difficulty::Normal => 140,
            Difficulty::Hard => 80,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    /// Next preset, wrapping from Hard back to Easy
    pub fn next(&self) -> Difficulty {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous preset, wrapping from Easy to Hard
    pub fn previous(&self) -> Difficulty {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Position within [`Difficulty::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
    /// Speed preset
    pub difficulty: Difficulty,
    /// Floor for the tick interval no matter how high the score gets
    pub min_tick_interval_ms: u64,
    /// How much faster each point makes the game
    pub speedup_per_point_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 30,
            difficulty: Difficulty::Normal,
            min_tick_interval_ms: 30,
            speedup_per_point_ms: 2,
        }
    }
}

impl GameConfig {
    /// Smallest board the snake can be reset onto and still turn around
    pub const MIN_SIDE: usize = 5;
    /// Largest side a terminal can draw at two columns per cell
    pub const MAX_SIDE: usize = 200;

    /// Create a new configuration with custom grid size
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Tick interval for the given score: shrinks by `speedup_per_point_ms`
    /// per point, never below `min_tick_interval_ms`
    pub fn tick_interval(&self, score: u32) -> Duration {
        let speedup = self.speedup_per_point_ms.saturating_mul(u64::from(score));
        let ms = self
            .difficulty
            .base_interval_ms()
            .saturating_sub(speedup)
            .max(self.min_tick_interval_ms);
        Duration::from_millis(ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows < Self::MIN_SIDE || self.cols < Self::MIN_SIDE {
            bail!(
                "board must be at least {0}x{0}, got {1}x{2}",
                Self::MIN_SIDE,
                self.rows,
                self.cols
            );
        }
        if self.rows > Self::MAX_SIDE || self.cols > Self::MAX_SIDE {
            bail!(
                "board must be at most {0}x{0}, got {1}x{2}",
                Self::MAX_SIDE,
                self.rows,
                self.cols
            );
        }
        if self.min_tick_interval_ms == 0 {
            bail!("min_tick_interval_ms must be positive");
        }
        Ok(())
    }
}
