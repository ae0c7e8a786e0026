//! Per-player snapshot document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Arena, CardRef, MatchRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clan {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub badge_id: Option<u64>,
}

/// Denormalized player document, replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Player tag including the leading `#`; unique key
    pub tag: String,

    pub name: String,

    #[serde(default)]
    pub exp_level: Option<u32>,
    #[serde(default)]
    pub trophies: Option<u32>,
    #[serde(default)]
    pub best_trophies: Option<u32>,
    #[serde(default)]
    pub battle_count: Option<u32>,
    #[serde(default)]
    pub wins: Option<u32>,
    #[serde(default)]
    pub losses: Option<u32>,
    #[serde(default)]
    pub three_crown_wins: Option<u32>,

    #[serde(default)]
    pub clan: Option<Clan>,
    #[serde(default)]
    pub arena: Option<Arena>,

    #[serde(default)]
    pub current_deck: Vec<CardRef>,

    /// Cards owned
    #[serde(default)]
    pub cards: Vec<CardRef>,

    /// Most recent first, capped at ingestion time
    #[serde(default)]
    pub battles: Vec<MatchRecord>,

    pub refreshed_at: DateTime<Utc>,
}

impl PlayerSnapshot {
    pub fn new(tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            exp_level: None,
            trophies: None,
            best_trophies: None,
            battle_count: None,
            wins: None,
            losses: None,
            three_crown_wins: None,
            clan: None,
            arena: None,
            current_deck: Vec::new(),
            cards: Vec::new(),
            battles: Vec::new(),
            refreshed_at: Utc::now(),
        }
    }

    pub fn with_battles(mut self, battles: Vec<MatchRecord>) -> Self {
        self.battles = battles;
        self
    }
}
