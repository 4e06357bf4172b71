//! Per-player checkpoint history and best-run ledger

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::Checkpoint;

/// One saved checkpoint with the time it was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub score: u32,
    pub level: u32,
    pub saved_at: DateTime<Utc>,
}

impl Sample {
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::new(self.score, self.level)
    }
}

/// Everything stored for one player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Samples in the order they were saved
    pub history: Vec<Sample>,
    /// Highest-scoring sample so far
    pub best: Option<Sample>,
}

/// What a save did to the best-run ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerUpdate {
    /// First sample for this player
    NewEntry,
    /// Score beat the previous best
    NewBest { previous: u32 },
    /// Score did not beat the current best
    NotBest { best: u32 },
}

/// A row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player: String,
    pub score: u32,
    pub level: u32,
    pub saved_at: DateTime<Utc>,
}

/// All players' records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    players: BTreeMap<String, PlayerRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample and update the player's best run
    ///
    /// The best run is replaced only by a strictly higher score.
    pub fn record(
        &mut self,
        player: &str,
        checkpoint: Checkpoint,
        saved_at: DateTime<Utc>,
    ) -> LedgerUpdate {
        let sample = Sample {
            score: checkpoint.score(),
            level: checkpoint.level(),
            saved_at,
        };
        let record = self.players.entry(player.to_string()).or_default();
        record.history.push(sample);

        match record.best {
            None => {
                record.best = Some(sample);
                LedgerUpdate::NewEntry
            }
            Some(best) if sample.score > best.score => {
                record.best = Some(sample);
                LedgerUpdate::NewBest {
                    previous: best.score,
                }
            }
            Some(best) => LedgerUpdate::NotBest { best: best.score },
        }
    }

    /// Most recently saved checkpoint for a player
    pub fn last(&self, player: &str) -> Option<Checkpoint> {
        self.players
            .get(player)
            .and_then(|record| record.history.last())
            .map(Sample::checkpoint)
    }

    pub fn history(&self, player: &str) -> &[Sample] {
        self.players
            .get(player)
            .map(|record| record.history.as_slice())
            .unwrap_or(&[])
    }

    pub fn best(&self, player: &str) -> Option<Sample> {
        self.players.get(player).and_then(|record| record.best)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Best runs ordered by score, highest first
    ///
    /// Ties go to the run saved first, then to the player name.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .players
            .iter()
            .filter_map(|(player, record)| {
                record.best.map(|best| LeaderboardEntry {
                    player: player.clone(),
                    score: best.score,
                    level: best.level,
                    saved_at: best.saved_at,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.saved_at.cmp(&b.saved_at))
                .then_with(|| a.player.cmp(&b.player))
        });
        entries.truncate(limit);
        entries
    }
}
