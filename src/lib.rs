//! Snake Ledger - a grid Snake whose progress is checkpointed per player
//!
//! This library provides:
//! - Core game logic, free of I/O (game module)
//! - Checkpoint storage and the best-score ledger (persistence module)
//! - TUI rendering and key mapping (render, input modules)
//! - Interactive play and ledger reports (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
