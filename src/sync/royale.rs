//! Clash Royale public API client.

use async_trait::async_trait;
use url::Url;

use super::source::{
    ItemList, LeaderboardEntry, LeaderboardSummary, MatchSource, RawBattle, RawPlayer,
};
use crate::fetch::{FetchError, Fetcher};

pub const DEFAULT_API_BASE: &str = "https://api.clashroyale.com/v1/";

pub struct RoyaleClient {
    fetcher: Fetcher,
    api_base: Url,
}

impl RoyaleClient {
    pub fn new(fetcher: Fetcher, api_base: &str) -> Result<Self, FetchError> {
        // A missing trailing slash would make `join` drop the last path segment
        let normalized = if api_base.ends_with('/') {
            api_base.to_string()
        } else {
            format!("{}/", api_base)
        };
        let api_base =
            Url::parse(&normalized).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", api_base, e)))?;

        Ok(Self { fetcher, api_base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.api_base
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// `#ABC123` becomes `%23ABC123`.
    pub fn encode_tag(tag: &str) -> String {
        format!("%23{}", tag.trim().trim_start_matches('#'))
    }
}

#[async_trait]
impl MatchSource for RoyaleClient {
    fn name(&self) -> &'static str {
        "clash-royale"
    }

    async fn leaderboards(&self) -> Result<Vec<LeaderboardSummary>, FetchError> {
        let url = self.endpoint("leaderboards")?;
        let list: ItemList<LeaderboardSummary> = self.fetcher.get_json(&url).await?;
        Ok(list.items)
    }

    async fn leaderboard_players(
        &self,
        leaderboard_id: u64,
    ) -> Result<Vec<LeaderboardEntry>, FetchError> {
        let url = self.endpoint(&format!("leaderboard/{}", leaderboard_id))?;
        let list: ItemList<LeaderboardEntry> = self.fetcher.get_json(&url).await?;
        Ok(list.items)
    }

    async fn player(&self, tag: &str) -> Result<RawPlayer, FetchError> {
        let url = self.endpoint(&format!("players/{}", Self::encode_tag(tag)))?;
        self.fetcher.get_json(&url).await
    }

    async fn battle_log(&self, tag: &str) -> Result<Vec<RawBattle>, FetchError> {
        let url = self.endpoint(&format!("players/{}/battlelog", Self::encode_tag(tag)))?;
        self.fetcher.get_json(&url).await
    }
}
