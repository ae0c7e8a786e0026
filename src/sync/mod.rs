//! Sync orchestrator.
//!
//! Coordinates the ingestion pipeline:
//! 1. Clear the player store
//! 2. Resolve the configured leaderboard by name
//! 3. Fetch profile and battle log for the top players
//! 4. Store every snapshot in a single write

pub mod convert;
pub mod royale;
pub mod source;

pub use royale::RoyaleClient;
pub use source::MatchSource;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::storage::PlayerStore;

/// Errors that can occur during sync.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] crate::fetch::FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),

    #[error("Leaderboard not found: {0}")]
    LeaderboardNotFound(String),

    #[error("A sync is already running")]
    AlreadyRunning,
}

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Exact leaderboard name to ingest
    pub leaderboard_name: String,

    /// Top N players taken from the leaderboard
    pub player_limit: usize,

    /// Most recent battles kept per player
    pub battle_limit: usize,

    /// Sync interval for periodic syncs
    pub interval: Duration,

    /// Fetch and convert but don't touch the store
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            leaderboard_name: "Retro Royale".to_string(),
            player_limit: 10,
            battle_limit: 20,
            interval: Duration::from_secs(6 * 3600),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

/// State of the most recent sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncState {
    pub last_sync_started: Option<DateTime<Utc>>,
    pub last_sync_completed: Option<DateTime<Utc>>,
    pub last_sync_status: SyncStatus,
    pub players_synced: usize,
    pub battles_stored: usize,
    pub last_error: Option<String>,
}

/// Result of a sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub leaderboard_id: u64,
    pub players_synced: usize,
    pub battles_stored: usize,
    pub dry_run: bool,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

fn as_millis<S: serde::Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(duration.as_millis() as u64)
}

/// Sync orchestrator.
pub struct SyncOrchestrator {
    config: SyncConfig,
    source: Arc<dyn MatchSource>,
    store: PlayerStore,
    state: Arc<RwLock<SyncState>>,
    run_lock: Mutex<()>,
}

impl SyncOrchestrator {
    pub fn new(config: SyncConfig, source: Arc<dyn MatchSource>, store: PlayerStore) -> Self {
        Self {
            config,
            source,
            store,
            state: Arc::new(RwLock::new(SyncState::default())),
            run_lock: Mutex::new(()),
        }
    }

    /// Get current sync state.
    pub async fn state(&self) -> SyncState {
        self.state.read().await.clone()
    }

    /// Run a single ingestion.
    ///
    /// Only one run at a time; a concurrent call fails with
    /// [`SyncError::AlreadyRunning`] instead of waiting.
    pub async fn sync_once(&self) -> Result<SyncResult, SyncError> {
        let _guard = self
            .run_lock
            .try_lock()
            .map_err(|_| SyncError::AlreadyRunning)?;

        {
            let mut state = self.state.write().await;
            state.last_sync_started = Some(Utc::now());
            state.last_sync_status = SyncStatus::Running;
            state.last_error = None;
        }

        let start = Instant::now();
        info!(
            "Starting sync from {} for leaderboard {:?}",
            self.source.name(),
            self.config.leaderboard_name
        );

        let outcome = self.ingest(start).await;

        let mut state = self.state.write().await;
        state.last_sync_completed = Some(Utc::now());
        match &outcome {
            Ok(result) => {
                state.last_sync_status = SyncStatus::Completed;
                state.players_synced = result.players_synced;
                state.battles_stored = result.battles_stored;
                info!(
                    "Sync completed: {} players, {} battles in {:?}",
                    result.players_synced, result.battles_stored, result.duration
                );
            }
            Err(e) => {
                state.last_sync_status = SyncStatus::Failed;
                state.players_synced = 0;
                state.battles_stored = 0;
                state.last_error = Some(e.to_string());
                error!("Sync failed: {}", e);
            }
        }

        outcome
    }

    async fn ingest(&self, start: Instant) -> Result<SyncResult, SyncError> {
        if self.config.dry_run {
            info!("Dry run: store left untouched");
        } else {
            self.store.delete_all()?;
        }

        let name = &self.config.leaderboard_name;
        let leaderboard = self
            .source
            .leaderboards()
            .await?
            .into_iter()
            .find(|l| &l.name == name)
            .ok_or_else(|| SyncError::LeaderboardNotFound(name.clone()))?;

        let entries = self.source.leaderboard_players(leaderboard.id).await?;
        let selected: Vec<_> = entries.into_iter().take(self.config.player_limit).collect();
        if selected.is_empty() {
            warn!("Leaderboard {} ({}) has no players", name, leaderboard.id);
        }

        let mut snapshots = Vec::with_capacity(selected.len());
        for (idx, entry) in selected.iter().enumerate() {
            info!(
                "[{}/{}] Fetching {} ({})",
                idx + 1,
                selected.len(),
                entry.name,
                entry.tag
            );
            let profile = self.source.player(&entry.tag).await?;
            let battle_log = self.source.battle_log(&entry.tag).await?;
            snapshots.push(convert::player_snapshot(
                profile,
                battle_log,
                self.config.battle_limit,
            ));
        }

        let players_synced = snapshots.len();
        let battles_stored = snapshots.iter().map(|s| s.battles.len()).sum();

        if !self.config.dry_run {
            self.store.upsert_many(snapshots)?;
        }

        Ok(SyncResult {
            leaderboard_id: leaderboard.id,
            players_synced,
            battles_stored,
            dry_run: self.config.dry_run,
            duration: start.elapsed(),
        })
    }

    /// Run periodic sync in the background.
    pub async fn run_periodic(self: Arc<Self>) {
        let mut ticker = interval(self.config.interval);

        info!("Starting periodic sync every {:?}", self.config.interval);

        loop {
            ticker.tick().await;

            match self.sync_once().await {
                Ok(result) => info!(
                    "Periodic sync completed: {} players, {} battles",
                    result.players_synced, result.battles_stored
                ),
                Err(SyncError::AlreadyRunning) => warn!("Skipping tick, sync already running"),
                Err(e) => error!("Periodic sync failed: {}", e),
            }
        }
    }
}
