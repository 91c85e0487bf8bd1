use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::game::GameConfig;

pub const DEFAULT_LEADERBOARD_PATH: &str = "leaderboard.txt";
pub const DEFAULT_LOG_PATH: &str = "snake_terra.log";

/// Everything the binary needs to start a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    /// Leaderboard file, relative to the working directory unless absolute
    pub leaderboard_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            leaderboard_path: PathBuf::from(DEFAULT_LEADERBOARD_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; missing keys take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.game.validate().context("Invalid game configuration")?;
        if self.leaderboard_path.as_os_str().is_empty() {
            bail!("leaderboard path must not be empty");
        }
        if self.log_path.as_os_str().is_empty() {
            bail!("log path must not be empty");
        }
        Ok(())
    }
}
