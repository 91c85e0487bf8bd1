use std::collections::VecDeque;

use super::action::Direction;

/// Length of a freshly reset snake
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub row: i32,
    pub col: i32,
}

impl Point {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move point by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Move point one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }

    /// Check if the point lies inside a `rows` x `cols` grid
    pub fn is_within(&self, rows: usize, cols: usize) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as usize) < rows && (self.col as usize) < cols
    }
}

/// The snake in the game
///
/// The body is ordered tail first, head last: a move pushes the new head on
/// the back and pops the tail off the front.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Point>,
    direction: Direction,
    pending_growth: bool,
}

impl Snake {
    /// Create a snake laid out horizontally around `origin`, heading right
    pub fn new(origin: Point) -> Self {
        let mut snake = Self {
            body: VecDeque::with_capacity(INITIAL_SNAKE_LENGTH),
            direction: Direction::Right,
            pending_growth: false,
        };
        snake.reset(origin);
        snake
    }

    /// Put the snake back at its starting shape around `origin`
    pub fn reset(&mut self, origin: Point) {
        self.body.clear();
        self.body.push_back(origin.moved_by(0, -1));
        self.body.push_back(origin);
        self.body.push_back(origin.moved_by(0, 1));
        self.direction = Direction::Right;
        self.pending_growth = false;
    }

    /// Body segments from tail to head
    pub fn body(&self) -> &VecDeque<Point> {
        &self.body
    }

    /// Get the head position
    pub fn head(&self) -> Point {
        // never empty: reset always lays down three segments and move pops
        // at most what it pushed
        self.body[self.body.len() - 1]
    }

    /// Get the tail position
    pub fn tail(&self) -> Point {
        self.body[0]
    }

    /// Current direction of movement
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the next move keeps the tail
    pub fn is_growing(&self) -> bool {
        self.pending_growth
    }

    /// Change direction, ignoring an immediate 180-degree reversal
    pub fn set_direction(&mut self, direction: Direction) {
        if !self.direction.is_opposite(direction) {
            self.direction = direction;
        }
    }

    /// Advance one cell in the current direction
    pub fn move_forward(&mut self) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.push_back(new_head);

        if self.pending_growth {
            self.pending_growth = false;
        } else {
            self.body.pop_front();
        }
    }

    /// Grow by one segment on the next move
    pub fn grow(&mut self) {
        self.pending_growth = true;
    }

    /// Check if any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Point) -> bool {
        self.body.contains(&pos)
    }

    /// Check if the head overlaps any other segment
    pub fn collides_with_self(&self) -> bool {
        let head = self.head();
        self.body.iter().rev().skip(1).any(|segment| *segment == head)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
