//! Battle records as stored per player.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::BattleType;

/// Upstream compact timestamp layout, e.g. `20250411T220846.000Z`.
pub const COMPACT_TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

#[derive(Debug, Error, PartialEq)]
#[error("Unrecognised battle time: {0}")]
pub struct BattleTimeError(pub String);

/// Parse an upstream battle timestamp.
///
/// Accepts the compact `YYYYMMDDThhmmss.mmmZ` form and falls back to RFC 3339.
pub fn parse_battle_time(s: &str) -> Result<DateTime<Utc>, BattleTimeError> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, COMPACT_TIME_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| BattleTimeError(s.to_string()))
}

/// Parse a query bound: a battle timestamp or a bare `YYYY-MM-DD` date.
///
/// A bare date resolves to the start of the day, or to its last millisecond
/// when `end_of_day` is set.
pub fn parse_time_bound(s: &str, end_of_day: bool) -> Result<DateTime<Utc>, BattleTimeError> {
    if let Ok(date) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        let time = if end_of_day {
            date.and_hms_milli_opt(23, 59, 59, 999)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        return time
            .map(|t| t.and_utc())
            .ok_or_else(|| BattleTimeError(s.to_string()));
    }
    parse_battle_time(s)
}

/// A card as used in a battle or owned by a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub max_level: u32,
    /// Medium icon URL, empty when upstream omitted it
    #[serde(default)]
    pub icon_url: String,
}

impl CardRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 0,
            max_level: 0,
            icon_url: String::new(),
        }
    }
}

/// One side of a battle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideEntry {
    /// Towers destroyed by this side (0-3)
    #[serde(default)]
    pub crowns: u8,

    #[serde(default)]
    pub cards: Vec<CardRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_trophies: Option<u32>,

    /// Remaining princess tower hit points, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub princess_towers_hit_points: Option<Vec<u32>>,
}

impl SideEntry {
    pub fn new(crowns: u8, cards: Vec<CardRef>) -> Self {
        Self {
            crowns,
            cards,
            starting_trophies: None,
            princess_towers_hit_points: None,
        }
    }

    pub fn with_starting_trophies(mut self, trophies: u32) -> Self {
        self.starting_trophies = Some(trophies);
        self
    }

    pub fn with_tower_hit_points(mut self, hit_points: Vec<u32>) -> Self {
        self.princess_towers_hit_points = Some(hit_points);
        self
    }

    /// Whether this side played the named card.
    pub fn uses_card(&self, name: &str) -> bool {
        self.cards.iter().any(|c| c.name == name)
    }

    pub fn card_names(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMode {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// One player's view of one battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub battle_time: DateTime<Utc>,

    #[serde(rename = "type", default)]
    pub battle_type: BattleType,

    /// The recording player's side; index 0 is authoritative
    #[serde(default)]
    pub team: Vec<SideEntry>,

    #[serde(default)]
    pub opponent: Vec<SideEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<GameMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ladder_tournament: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arena: Option<Arena>,
}

impl MatchRecord {
    pub fn new(
        battle_time: DateTime<Utc>,
        battle_type: BattleType,
        team: SideEntry,
        opponent: SideEntry,
    ) -> Self {
        Self {
            battle_time,
            battle_type,
            team: vec![team],
            opponent: vec![opponent],
            game_mode: None,
            is_ladder_tournament: None,
            arena: None,
        }
    }

    /// The authoritative sides, if both are present.
    pub fn matchup(&self) -> Option<Matchup<'_>> {
        Some(Matchup {
            team: self.team.first()?,
            opponent: self.opponent.first()?,
        })
    }
}

/// Result of a battle from the team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TeamWin,
    OpponentWin,
    Draw,
}

/// The two authoritative sides of a record.
#[derive(Debug, Clone, Copy)]
pub struct Matchup<'a> {
    pub team: &'a SideEntry,
    pub opponent: &'a SideEntry,
}

impl<'a> Matchup<'a> {
    pub fn outcome(&self) -> Outcome {
        use std::cmp::Ordering;
        match self.team.crowns.cmp(&self.opponent.crowns) {
            Ordering::Greater => Outcome::TeamWin,
            Ordering::Less => Outcome::OpponentWin,
            Ordering::Equal => Outcome::Draw,
        }
    }

    /// `(winner, loser)`, or `None` on equal crowns.
    pub fn winner_and_loser(&self) -> Option<(&'a SideEntry, &'a SideEntry)> {
        match self.outcome() {
            Outcome::TeamWin => Some((self.team, self.opponent)),
            Outcome::OpponentWin => Some((self.opponent, self.team)),
            Outcome::Draw => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn test_parse_compact_battle_time() {
        let dt = parse_battle_time("20250411T220846.000Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 4, 11, 22, 8, 46).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_battle_time() {
        let dt = parse_battle_time("2025-04-11T22:08:46Z").unwrap();
        assert_eq!(dt.hour(), 22);
        assert_eq!(dt.day(), 11);
    }

    #[test]
    fn test_parse_battle_time_rejects_garbage() {
        assert!(parse_battle_time("yesterday").is_err());
        assert!(parse_battle_time("").is_err());
    }

    #[test]
    fn test_parse_time_bound_date_only() {
        let start = parse_time_bound("2025-03-26", false).unwrap();
        let end = parse_time_bound("2025-03-26", true).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 26, 0, 0, 0).unwrap());
        assert_eq!(end.hour(), 23);
        assert_eq!(end.minute(), 59);
        assert!(end > start);
    }

    #[test]
    fn test_parse_time_bound_full_timestamp_ignores_end_of_day() {
        let bound = parse_time_bound("20250412T120000.000Z", true).unwrap();
        assert_eq!(bound, Utc.with_ymd_and_hms(2025, 4, 12, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_matchup_requires_both_sides() {
        let mut record = MatchRecord::new(
            Utc::now(),
            BattleType::Pvp,
            SideEntry::new(1, vec![]),
            SideEntry::new(0, vec![]),
        );
        assert!(record.matchup().is_some());

        record.opponent.clear();
        assert!(record.matchup().is_none());
    }

    #[test]
    fn test_outcome_and_winner() {
        let team = SideEntry::new(2, vec![CardRef::new("Zap")]);
        let opponent = SideEntry::new(1, vec![CardRef::new("Log")]);
        let matchup = Matchup {
            team: &team,
            opponent: &opponent,
        };

        assert_eq!(matchup.outcome(), Outcome::TeamWin);
        let (winner, loser) = matchup.winner_and_loser().unwrap();
        assert!(winner.uses_card("Zap"));
        assert!(loser.uses_card("Log"));
    }

    #[test]
    fn test_draw_has_no_winner() {
        let side = SideEntry::new(1, vec![]);
        let matchup = Matchup {
            team: &side,
            opponent: &side,
        };
        assert_eq!(matchup.outcome(), Outcome::Draw);
        assert!(matchup.winner_and_loser().is_none());
    }

    #[test]
    fn test_record_serializes_type_tag() {
        let record = MatchRecord::new(
            Utc.with_ymd_and_hms(2025, 4, 1, 10, 0, 0).unwrap(),
            BattleType::PathOfLegend,
            SideEntry::new(3, vec![CardRef::new("Hog Rider")]).with_starting_trophies(7000),
            SideEntry::new(0, vec![]),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "pathOfLegend");
        assert_eq!(json["team"][0]["starting_trophies"], 7000);
        assert!(json["opponent"][0].get("starting_trophies").is_none());

        let parsed: MatchRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
