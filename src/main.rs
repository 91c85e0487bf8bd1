use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::PathBuf;

use snake_terra::app::App;
use snake_terra::config::AppConfig;
use snake_terra::game::Difficulty;
use snake_terra::leaderboard::Leaderboard;
use snake_terra::logging::init_logging;
use snake_terra::modes::InteractiveMode;

#[derive(Parser)]
#[command(name = "snake_terra")]
#[command(version, about = "Terminal Snake with difficulty levels and a persistent leaderboard")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board height in cells
    #[arg(long)]
    rows: Option<usize>,

    /// Board width in cells
    #[arg(long)]
    cols: Option<usize>,

    /// Starting difficulty (also changeable from the menu)
    #[arg(long)]
    difficulty: Option<DifficultyArg>,

    /// Leaderboard file
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

impl Cli {
    fn into_config(self) -> Result<(AppConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(rows) = self.rows {
            config.game.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.game.cols = cols;
        }
        if let Some(difficulty) = self.difficulty {
            config.game.difficulty = difficulty.into();
        }
        if let Some(path) = self.leaderboard {
            config.leaderboard_path = path;
        }
        if let Some(path) = self.log_file {
            config.log_path = path;
        }

        config.validate()?;
        Ok((config, self.verbose))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (config, verbose) = Cli::parse().into_config()?;

    if let Err(err) = init_logging(&config.log_path, verbose) {
        eprintln!("warning: {:#}; continuing without a log", err);
    }
    info!(
        "starting snake_terra: {}x{} board, difficulty {}, leaderboard {}",
        config.game.rows,
        config.game.cols,
        config.game.difficulty,
        config.leaderboard_path.display()
    );

    let leaderboard = Leaderboard::open(&config.leaderboard_path);
    let mut mode = InteractiveMode::new(App::new(config.game, leaderboard));

    if let Err(err) = mode.run().await {
        warn!("session ended with an error: {:#}", err);
        return Err(err);
    }

    info!("bye");
    Ok(())
}
