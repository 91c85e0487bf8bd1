use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::state::{Point, Snake};

/// The single piece of food on the board
///
/// Owns its random source so placement is reproducible when seeded.
#[derive(Debug, Clone)]
pub struct Food<R = StdRng> {
    position: Option<Point>,
    rng: R,
}

impl<R: Rng> Food<R> {
    /// Create unplaced food drawing from `rng`
    pub fn new(rng: R) -> Self {
        Self {
            position: None,
            rng,
        }
    }

    /// Current position, or `None` when no free cell was left at the last spawn
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Check if the food sits on `pos`
    pub fn is_at(&self, pos: Point) -> bool {
        self.position == Some(pos)
    }

    /// Place the food on a uniformly random cell the snake does not cover
    ///
    /// Leaves the food unplaced when the snake fills the whole grid.
    pub fn spawn(&mut self, rows: usize, cols: usize, snake: &Snake) -> Option<Point> {
        let empties: Vec<Point> = (0..rows as i32)
            .flat_map(|row| (0..cols as i32).map(move |col| Point::new(row, col)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        self.position = empties.choose(&mut self.rng).copied();
        self.position
    }

    /// Force a position; used to set up specific boards
    pub fn place(&mut self, pos: Option<Point>) {
        self.position = pos;
    }
}
