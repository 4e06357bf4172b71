use serde::{Deserialize, Serialize};

/// A (score, level) sample of a run's progress
///
/// Checkpoints are values: a later save creates a new one rather than
/// editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint {
    score: u32,
    level: u32,
}

impl Checkpoint {
    pub fn new(score: u32, level: u32) -> Self {
        Self { score, level }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}
