//! Errors raised by the simulation core

use thiserror::Error;

use crate::persistence::StoreError;

/// Errors that can occur while driving a run
#[derive(Error, Debug)]
pub enum GameError {
    #[error("No free cell left to place food")]
    NoSpaceAvailable,

    /// The board filled up and the final checkpoint was lost as well
    #[error("No free cell left to place food, and the final checkpoint failed: {0}")]
    BoardFullUnsaved(#[source] StoreError),

    #[error("Checkpoint could not be persisted: {0}")]
    PersistenceFailure(#[from] StoreError),

    #[error("Run is already over")]
    NotRunning,

    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),
}
