use std::time::{Duration, Instant};

/// Per-process play statistics shown next to the board
pub struct GameMetrics {
    /// Play time banked before the current running stretch
    banked: Duration,
    /// Start of the current running stretch, `None` while paused or over
    running_since: Option<Instant>,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            banked: Duration::ZERO,
            running_since: None,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.banked
            + self
                .running_since
                .map(|since| since.elapsed())
                .unwrap_or(Duration::ZERO);
    }

    pub fn on_game_start(&mut self) {
        self.banked = Duration::ZERO;
        self.running_since = Some(Instant::now());
        self.elapsed_time = Duration::ZERO;
    }

    /// Stop or restart the clock without ending the game
    pub fn on_pause_changed(&mut self, paused: bool) {
        if paused {
            self.stop_clock();
        } else if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.stop_clock();
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    fn stop_clock(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.banked += since.elapsed();
        }
        self.elapsed_time = self.banked;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
