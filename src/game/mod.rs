//! Core game logic module for Snake
//!
//! This module contains the simulation without any I/O or rendering
//! dependencies. Persistence is reached only through the
//! [`CheckpointStore`](crate::persistence::CheckpointStore) handed to
//! [`GameLoop`] at construction.

pub mod checkpoint;
pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use checkpoint::Checkpoint;
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameLoop, Snapshot, StepResult};
pub use error::GameError;
pub use food::{Food, FoodColor, FoodSpawner};
pub use state::{GameOverReason, Phase, Position, RunState, Snake};
