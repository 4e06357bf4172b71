//! Checkpoint persistence
//!
//! The game loop only sees the [`CheckpointStore`] trait. Two stores are
//! provided: [`MemoryStore`] for tests and throwaway sessions, and
//! [`JsonFileStore`] which keeps the ledger in a JSON file.

pub mod error;
pub mod file;
pub mod ledger;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use ledger::{LeaderboardEntry, Ledger, LedgerUpdate, PlayerRecord, Sample};

use chrono::Utc;

use crate::game::Checkpoint;

/// Storage for players' checkpoints
pub trait CheckpointStore {
    /// Most recent checkpoint saved for `player`, if any
    fn load_checkpoint(&self, player: &str) -> Result<Option<Checkpoint>, StoreError>;

    /// Append a checkpoint for `player`
    ///
    /// Implementations also keep the player's best run up to date.
    fn save_checkpoint(&mut self, player: &str, checkpoint: Checkpoint) -> Result<(), StoreError>;
}

impl<S: CheckpointStore + ?Sized> CheckpointStore for &mut S {
    fn load_checkpoint(&self, player: &str) -> Result<Option<Checkpoint>, StoreError> {
        (**self).load_checkpoint(player)
    }

    fn save_checkpoint(&mut self, player: &str, checkpoint: Checkpoint) -> Result<(), StoreError> {
        (**self).save_checkpoint(player, checkpoint)
    }
}

pub(crate) fn log_update(player: &str, checkpoint: Checkpoint, update: LedgerUpdate) {
    match update {
        LedgerUpdate::NewEntry => {
            tracing::info!(player, score = checkpoint.score(), "new leaderboard entry created")
        }
        LedgerUpdate::NewBest { previous } => tracing::info!(
            player,
            score = checkpoint.score(),
            previous,
            "leaderboard updated with new high score"
        ),
        LedgerUpdate::NotBest { best } => tracing::info!(
            player,
            score = checkpoint.score(),
            best,
            "score saved, not higher than best"
        ),
    }
}

/// Ledger held in memory only
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Ledger,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

impl CheckpointStore for MemoryStore {
    fn load_checkpoint(&self, player: &str) -> Result<Option<Checkpoint>, StoreError> {
        Ok(self.ledger.last(player))
    }

    fn save_checkpoint(&mut self, player: &str, checkpoint: Checkpoint) -> Result<(), StoreError> {
        let update = self.ledger.record(player, checkpoint, Utc::now());
        log_update(player, checkpoint, update);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_checkpoint("ana").unwrap(), None);

        store.save_checkpoint("ana", Checkpoint::new(3, 0)).unwrap();
        store.save_checkpoint("ana", Checkpoint::new(5, 1)).unwrap();

        assert_eq!(
            store.load_checkpoint("ana").unwrap(),
            Some(Checkpoint::new(5, 1))
        );
        assert_eq!(store.ledger().history("ana").len(), 2);
    }

    #[test]
    fn test_mut_ref_is_a_store() {
        fn save_through<S: CheckpointStore>(mut store: S) {
            store.save_checkpoint("bo", Checkpoint::new(1, 0)).unwrap();
        }

        let mut store = MemoryStore::new();
        save_through(&mut store);
        assert_eq!(
            store.load_checkpoint("bo").unwrap(),
            Some(Checkpoint::new(1, 0))
        );
    }
}
