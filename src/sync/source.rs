//! Upstream match data abstraction.
//!
//! The ingestion job only sees this trait; the Clash Royale client implements
//! it for production and tests swap in a canned source.

use async_trait::async_trait;
use serde::Deserialize;

use crate::fetch::FetchError;
use crate::models::{Arena, GameMode};

/// `{ "items": [...] }` envelope used by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardSummary {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClan {
    pub tag: String,
    pub name: String,
    pub badge_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub tag: String,
    pub name: String,
    pub rank: Option<u32>,
    pub score: Option<u32>,
    pub clan: Option<RawClan>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIconUrls {
    pub medium: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub max_level: u32,
    pub icon_urls: Option<RawIconUrls>,
}

/// Player profile from `players/{tag}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayer {
    pub tag: String,
    pub name: String,
    pub exp_level: Option<u32>,
    pub trophies: Option<u32>,
    pub best_trophies: Option<u32>,
    pub battle_count: Option<u32>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub three_crown_wins: Option<u32>,
    pub clan: Option<RawClan>,
    pub arena: Option<Arena>,
    #[serde(default)]
    pub current_deck: Vec<RawCard>,
    #[serde(default)]
    pub cards: Vec<RawCard>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParticipant {
    pub tag: Option<String>,
    pub name: Option<String>,
    pub starting_trophies: Option<u32>,
    pub crowns: Option<u8>,
    pub princess_towers_hit_points: Option<Vec<u32>>,
    #[serde(default)]
    pub cards: Vec<RawCard>,
}

/// One entry of `players/{tag}/battlelog`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBattle {
    pub battle_time: String,
    #[serde(rename = "type")]
    pub battle_type: Option<String>,
    #[serde(default)]
    pub team: Vec<RawParticipant>,
    #[serde(default)]
    pub opponent: Vec<RawParticipant>,
    pub game_mode: Option<GameMode>,
    pub is_ladder_tournament: Option<bool>,
    pub arena: Option<Arena>,
}

/// Source of leaderboards, player profiles and battle logs.
#[async_trait]
pub trait MatchSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn leaderboards(&self) -> Result<Vec<LeaderboardSummary>, FetchError>;

    /// Players on a leaderboard, best first.
    async fn leaderboard_players(
        &self,
        leaderboard_id: u64,
    ) -> Result<Vec<LeaderboardEntry>, FetchError>;

    async fn player(&self, tag: &str) -> Result<RawPlayer, FetchError>;

    /// Battle log, most recent first.
    async fn battle_log(&self, tag: &str) -> Result<Vec<RawBattle>, FetchError>;
}

/// Canned source for tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    pub leaderboards: Vec<LeaderboardSummary>,
    pub players: Vec<LeaderboardEntry>,
    pub battle_logs: std::collections::HashMap<String, Vec<RawBattle>>,
    /// Tag whose battle log request fails
    pub failing_tag: Option<String>,
}

#[cfg(test)]
impl MockSource {
    pub fn with_leaderboard(name: &str, players: Vec<LeaderboardEntry>) -> Self {
        Self {
            leaderboards: vec![LeaderboardSummary {
                id: 170000005,
                name: name.to_string(),
            }],
            players,
            ..Default::default()
        }
    }

    pub fn with_battle_log(mut self, tag: &str, battles: Vec<RawBattle>) -> Self {
        self.battle_logs.insert(tag.to_string(), battles);
        self
    }
}

#[cfg(test)]
#[async_trait]
impl MatchSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn leaderboards(&self) -> Result<Vec<LeaderboardSummary>, FetchError> {
        Ok(self.leaderboards.clone())
    }

    async fn leaderboard_players(
        &self,
        _leaderboard_id: u64,
    ) -> Result<Vec<LeaderboardEntry>, FetchError> {
        Ok(self.players.clone())
    }

    async fn player(&self, tag: &str) -> Result<RawPlayer, FetchError> {
        let entry = self
            .players
            .iter()
            .find(|p| p.tag == tag)
            .ok_or_else(|| FetchError::HttpStatus {
                status: 404,
                message: "Not Found".to_string(),
            })?;
        Ok(RawPlayer {
            tag: entry.tag.clone(),
            name: entry.name.clone(),
            trophies: entry.score,
            ..Default::default()
        })
    }

    async fn battle_log(&self, tag: &str) -> Result<Vec<RawBattle>, FetchError> {
        if self.failing_tag.as_deref() == Some(tag) {
            return Err(FetchError::HttpStatus {
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(self.battle_logs.get(tag).cloned().unwrap_or_default())
    }
}
