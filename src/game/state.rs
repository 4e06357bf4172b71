use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Check if the position lies on a `width` x `height` grid
    pub fn is_within(&self, width: usize, height: usize) -> bool {
        self.x >= 0 && (self.x as usize) < width && self.y >= 0 && (self.y as usize) < height
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
    /// Direction of the last committed move
    direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    ///
    /// Segments trail behind the head, opposite to `direction`.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(dx * i, dy * i))
            .collect();

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    ///
    /// Returns `None` for an empty body.
    pub fn from_segments(body: Vec<Position>, direction: Direction) -> Option<Self> {
        if body.is_empty() {
            return None;
        }
        Some(Self { body, direction })
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// The last segment, which vacates its cell on a move without growth
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Check if moving the head onto `pos` would hit the body
    ///
    /// The tail is excluded: it moves out of the way in the same tick.
    pub fn blocks(&self, pos: Position) -> bool {
        self.body[..self.body.len() - 1].contains(&pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Cells covered by the snake
    pub fn occupancy(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    /// Push a new head, dropping the tail unless the snake grows
    pub(crate) fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true once constructed)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver(GameOverReason),
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// Snake left the grid
    Wall,
    /// Snake ran into its own body
    SelfCollision,
    /// Player asked to stop
    Quit,
    /// No free cell was left for food
    BoardFull,
}

impl GameOverReason {
    pub fn describe(&self) -> &'static str {
        match self {
            GameOverReason::Wall => "hit the wall",
            GameOverReason::SelfCollision => "ran into itself",
            GameOverReason::Quit => "quit",
            GameOverReason::BoardFull => "filled the board",
        }
    }
}

/// Score, level and pace of the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    pub score: u32,
    pub level: u32,
    /// Ticks per second
    pub speed: u32,
    pub alive: bool,
}

impl RunState {
    pub fn new(initial_speed: u32) -> Self {
        Self {
            score: 0,
            level: 0,
            speed: initial_speed,
            alive: true,
        }
    }

    /// Wall-clock time between ticks at the current speed, never below 1 ms
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis((1000 / u64::from(self.speed.max(1))).max(1))
    }
}
