//! Player snapshot collection.

use tracing::info;

use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{MatchRecord, PlayerSnapshot, TimeWindow};

/// Durable collection of player snapshots keyed by tag.
#[derive(Debug, Clone)]
pub struct PlayerStore {
    config: StorageConfig,
}

impl PlayerStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn reader(&self) -> JsonlReader<PlayerSnapshot> {
        JsonlReader::new(self.config.players_path())
    }

    fn writer(&self) -> JsonlWriter<PlayerSnapshot> {
        JsonlWriter::new(self.config.players_path())
    }

    pub fn all(&self) -> Result<Vec<PlayerSnapshot>, StorageError> {
        self.reader().read_all()
    }

    pub fn find(&self, tag: &str) -> Result<Option<PlayerSnapshot>, StorageError> {
        Ok(self.all()?.into_iter().find(|p| p.tag == tag))
    }

    /// Insert or fully replace the snapshot with the same tag.
    pub fn upsert(&self, player: PlayerSnapshot) -> Result<(), StorageError> {
        self.upsert_many(vec![player]).map(|_| ())
    }

    /// Upsert a batch in a single write. Returns the number of documents stored.
    pub fn upsert_many(&self, players: Vec<PlayerSnapshot>) -> Result<usize, StorageError> {
        let mut stored = self.all()?;
        for player in players {
            match stored.iter_mut().find(|p| p.tag == player.tag) {
                Some(existing) => *existing = player,
                None => stored.push(player),
            }
        }
        self.writer().write_all(&stored)
    }

    /// Remove every snapshot.
    pub fn delete_all(&self) -> Result<(), StorageError> {
        self.writer().write_all(&[])?;
        info!("Cleared player store at {:?}", self.config.players_path());
        Ok(())
    }

    /// Every embedded battle inside `window`, across all players.
    pub fn battles(&self, window: &TimeWindow) -> Result<Vec<MatchRecord>, StorageError> {
        Ok(self
            .all()?
            .into_iter()
            .flat_map(|p| p.battles)
            .filter(|b| window.contains(b.battle_time))
            .collect())
    }
}
