use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

use super::{
    action::Direction,
    config::{Difficulty, GameConfig},
    food::Food,
    state::{Point, Snake},
};

/// Why a play session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    /// Head left the grid
    OutOfBounds,
    /// Head ran into the body
    SelfCollision,
    /// The snake covers every cell, so no food can be placed
    BoardFilled,
    /// The player quit mid-game
    Abandoned,
}

impl EndCause {
    pub fn is_win(&self) -> bool {
        matches!(self, EndCause::BoardFilled)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            EndCause::OutOfBounds => "Hit the wall",
            EndCause::SelfCollision => "Bit your own tail",
            EndCause::BoardFilled => "Board filled - you win!",
            EndCause::Abandoned => "Game abandoned",
        }
    }
}

/// Lifecycle of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    NotStarted,
    Running,
    Ended(EndCause),
}

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set when this step ended the session
    pub ended: Option<EndCause>,
}

/// Drives snake, food and score through one play session at a time
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    snake: Snake,
    food: Food<R>,
    score: u32,
    phase: GamePhase,
    paused: bool,
    last_advance: Instant,
    /// Latest direction input since the last step
    pending_direction: Option<Direction>,
    /// Preset the next `play()` will use
    selected_difficulty: Difficulty,
}

impl GameEngine<StdRng> {
    /// Create an engine whose food placement is seeded from the OS
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine with an explicit random source for food placement
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let origin = Self::origin_for(&config);
        let selected_difficulty = config.difficulty;
        Self {
            config,
            snake: Snake::new(origin),
            food: Food::new(rng),
            score: 0,
            phase: GamePhase::NotStarted,
            paused: false,
            last_advance: Instant::now(),
            pending_direction: None,
            selected_difficulty,
        }
    }

    fn origin_for(config: &GameConfig) -> Point {
        Point::new((config.rows / 2) as i32, (config.cols / 2) as i32)
    }

    /// Start a fresh session: zero score, centred snake, new food
    pub fn play(&mut self, now: Instant) {
        self.score = 0;
        self.paused = false;
        self.pending_direction = None;
        self.config.difficulty = self.selected_difficulty;
        self.snake.reset(Self::origin_for(&self.config));
        self.food.spawn(self.config.rows, self.config.cols, &self.snake);
        self.phase = GamePhase::Running;
        self.last_advance = now;

        info!(
            "game started: {}x{} board, difficulty {}",
            self.config.rows, self.config.cols, self.config.difficulty
        );
    }

    /// Buffer a direction input for the next step; a later input replaces
    /// an earlier one, and reversals are ignored by the snake itself
    pub fn steer(&mut self, direction: Direction) {
        if self.is_running() && !self.paused {
            self.pending_direction = Some(direction);
        }
    }

    /// Advance the game if at least one tick interval has passed since the
    /// last step
    pub fn tick(&mut self, now: Instant) -> Option<StepOutcome> {
        if !self.is_running() {
            return None;
        }
        if self.paused {
            return None;
        }
        if now.saturating_duration_since(self.last_advance) < self.tick_interval() {
            return None;
        }

        let outcome = self.step();
        self.last_advance = now;
        Some(outcome)
    }

    /// Move the snake one cell and resolve walls, self-collision and food
    ///
    /// Does nothing once the session is no longer running.
    pub fn step(&mut self) -> StepOutcome {
        if !self.is_running() {
            return StepOutcome::default();
        }

        if let Some(direction) = self.pending_direction.take() {
            self.snake.set_direction(direction);
        }
        self.snake.move_forward();
        let head = self.snake.head();

        if !head.is_within(self.config.rows, self.config.cols) {
            return self.end(EndCause::OutOfBounds);
        }

        if self.snake.collides_with_self() {
            return self.end(EndCause::SelfCollision);
        }

        if !self.food.is_at(head) {
            return StepOutcome::default();
        }

        self.score += 1;
        self.snake.grow();
        debug!("food eaten at {:?}, score {}", head, self.score);

        if self
            .food
            .spawn(self.config.rows, self.config.cols, &self.snake)
            .is_none()
        {
            // no free cell left anywhere on the board
            let mut outcome = self.end(EndCause::BoardFilled);
            outcome.ate_food = true;
            return outcome;
        }

        StepOutcome {
            ate_food: true,
            ended: None,
        }
    }

    fn end(&mut self, cause: EndCause) -> StepOutcome {
        self.phase = GamePhase::Ended(cause);
        self.paused = false;
        self.pending_direction = None;
        info!(
            "game ended: {:?}, score {}, length {}",
            cause,
            self.score,
            self.snake.len()
        );
        StepOutcome {
            ate_food: false,
            ended: Some(cause),
        }
    }

    /// Pause or resume; resuming restarts the tick timer from `now`
    pub fn toggle_pause(&mut self, now: Instant) {
        if !self.is_running() {
            return;
        }
        self.paused = !self.paused;
        if !self.paused {
            self.last_advance = now;
        }
    }

    /// End the running session at the player's request
    pub fn abandon(&mut self) {
        if self.is_running() {
            self.end(EndCause::Abandoned);
        }
    }

    /// Choose the speed preset for the next `play()`; a running session
    /// keeps the preset it started with
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.selected_difficulty = difficulty;
    }

    /// Preset the next session will start with
    pub fn difficulty(&self) -> Difficulty {
        self.selected_difficulty
    }

    /// Preset the current (or last) session is running at
    pub fn active_difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Current interval between steps
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval(self.score)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    /// Food position, `None` when it could not be placed
    pub fn food(&self) -> Option<Point> {
        self.food.position()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Cause of the last finished session, if any
    pub fn end_cause(&self) -> Option<EndCause> {
        match self.phase {
            GamePhase::Ended(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.config.rows
    }

    pub fn cols(&self) -> usize {
        self.config.cols
    }

    #[cfg(test)]
    pub(crate) fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, pos: Option<Point>) {
        self.food.place(pos);
    }
}
