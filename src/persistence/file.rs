//! Ledger stored as a JSON file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::ledger::Ledger;
use super::{CheckpointStore, StoreError, log_update};
use crate::game::Checkpoint;

/// Checkpoint store backed by a JSON file
///
/// The whole ledger is loaded on open and rewritten on every save. Writes
/// go to a sibling temp file first and are renamed over the ledger, so a
/// failed save leaves both the file and the in-memory copy unchanged.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    ledger: Ledger,
}

impl JsonFileStore {
    /// Open the ledger at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let ledger = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).map_err(|source| StoreError::Serialization {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => Ledger::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), players = ledger.player_count(), "ledger opened");
        Ok(Self { path, ledger })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    fn write(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(ledger).map_err(|source| {
            StoreError::Serialization {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl CheckpointStore for JsonFileStore {
    fn load_checkpoint(&self, player: &str) -> Result<Option<Checkpoint>, StoreError> {
        Ok(self.ledger.last(player))
    }

    fn save_checkpoint(&mut self, player: &str, checkpoint: Checkpoint) -> Result<(), StoreError> {
        let mut next = self.ledger.clone();
        let update = next.record(player, checkpoint, Utc::now());
        self.write(&next)?;

        self.ledger = next;
        log_update(player, checkpoint, update);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("scores.json")).unwrap();

        assert_eq!(store.load_checkpoint("ana").unwrap(), None);
        assert_eq!(store.ledger().player_count(), 0);
    }

    #[test]
    fn test_saves_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("scores.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.save_checkpoint("ana", Checkpoint::new(9, 1)).unwrap();
        store.save_checkpoint("ana", Checkpoint::new(4, 0)).unwrap();
        store.save_checkpoint("bo", Checkpoint::new(15, 3)).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.load_checkpoint("ana").unwrap(),
            Some(Checkpoint::new(4, 0))
        );
        assert_eq!(reopened.ledger().best("ana").unwrap().score, 9);

        let top = reopened.ledger().leaderboard(10);
        assert_eq!(top[0].player, "bo");
        assert_eq!(top.len(), 2);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Serialization { .. })
        ));
    }

    #[test]
    fn test_failed_write_keeps_ledger() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let mut store = JsonFileStore::open(&path).unwrap();
        let result = store.save_checkpoint("ana", Checkpoint::new(3, 0));

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert_eq!(store.load_checkpoint("ana").unwrap(), None);
    }
}
