use std::time::{Duration, Instant};

use crate::game::{Checkpoint, GameError, StepResult};

/// Outcome of the most recent checkpoint attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved(Checkpoint),
    Failed(String),
}

impl SaveStatus {
    pub fn describe(&self) -> String {
        match self {
            SaveStatus::Saved(cp) => format!("saved {} pts / lvl {}", cp.score(), cp.level()),
            SaveStatus::Failed(reason) => format!("save failed: {}", reason),
        }
    }
}

pub struct RunMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub ticks: u64,
    pub foods_eaten: u32,
    pub saves: u32,
    pub failed_saves: u32,
    pub last_save: Option<SaveStatus>,
    finished: bool,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            ticks: 0,
            foods_eaten: 0,
            saves: 0,
            failed_saves: 0,
            last_save: None,
            finished: false,
        }
    }

    /// Refresh the clock; it stops once the run is over
    pub fn update(&mut self) {
        if !self.finished {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_step(&mut self, step: &StepResult) {
        if step.terminated() {
            self.update();
            self.finished = true;
            if let Some(cp) = step.final_checkpoint {
                self.on_save(&Ok(cp));
            }
            return;
        }

        self.ticks += 1;
        if step.ate_food.is_some() {
            self.foods_eaten += 1;
        }
    }

    pub fn on_save(&mut self, outcome: &Result<Checkpoint, GameError>) {
        match outcome {
            Ok(cp) => {
                self.saves += 1;
                self.last_save = Some(SaveStatus::Saved(*cp));
            }
            Err(err) => {
                self.failed_saves += 1;
                self.last_save = Some(SaveStatus::Failed(err.to_string()));
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Mark the run over without a step, e.g. after a failed final save
    pub fn finish(&mut self) {
        self.update();
        self.finished = true;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}
