//! Battle type tags reported by the upstream battle log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad grouping of battle types used by the duration heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeClass {
    /// Ladder, ranked and war modes that usually run to full time when few crowns fall
    Ranked,
    /// Elixir-boosted and casual modes
    Fast,
    SuddenDeath,
    Survival,
    /// Tutorial and PvE battles
    Training,
    /// Anything not covered above
    Unclassified,
}

/// A battle type tag.
///
/// Known tags are explicit variants; anything else is kept verbatim in `Other`
/// so stored records round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BattleType {
    Pvp,
    Trail,
    PathOfLegend,
    Tournament,
    SeasonalBattle,
    ClanWarWarDay,
    RiverRacePvp,
    RiverRaceDuel,
    RiverRaceDuelColosseum,
    ClanWarCollectionDay,
    TripleElixir,
    DoubleElixir,
    RampUp,
    Casual,
    Pvp2v2,
    ClanMate,
    Challenge,
    Friendly,
    BoatBattle,
    BoatBattlePractice,
    Practice,
    SuddenDeath,
    Survival,
    Tutorial,
    Pve,
    Other(String),
}

impl BattleType {
    /// Every known tag, in declaration order.
    pub const KNOWN: [BattleType; 25] = [
        BattleType::Pvp,
        BattleType::Trail,
        BattleType::PathOfLegend,
        BattleType::Tournament,
        BattleType::SeasonalBattle,
        BattleType::ClanWarWarDay,
        BattleType::RiverRacePvp,
        BattleType::RiverRaceDuel,
        BattleType::RiverRaceDuelColosseum,
        BattleType::ClanWarCollectionDay,
        BattleType::TripleElixir,
        BattleType::DoubleElixir,
        BattleType::RampUp,
        BattleType::Casual,
        BattleType::Pvp2v2,
        BattleType::ClanMate,
        BattleType::Challenge,
        BattleType::Friendly,
        BattleType::BoatBattle,
        BattleType::BoatBattlePractice,
        BattleType::Practice,
        BattleType::SuddenDeath,
        BattleType::Survival,
        BattleType::Tutorial,
        BattleType::Pve,
    ];

    /// The upstream tag string.
    pub fn as_str(&self) -> &str {
        match self {
            BattleType::Pvp => "pvp",
            BattleType::Trail => "trail",
            BattleType::PathOfLegend => "pathOfLegend",
            BattleType::Tournament => "tournament",
            BattleType::SeasonalBattle => "seasonalBattle",
            BattleType::ClanWarWarDay => "clanWarWarDay",
            BattleType::RiverRacePvp => "riverRacePvp",
            BattleType::RiverRaceDuel => "riverRaceDuel",
            BattleType::RiverRaceDuelColosseum => "riverRaceDuelColosseum",
            BattleType::ClanWarCollectionDay => "clanWarCollectionDay",
            BattleType::TripleElixir => "tripleElixir",
            BattleType::DoubleElixir => "doubleElixir",
            BattleType::RampUp => "rampUp",
            BattleType::Casual => "casual",
            BattleType::Pvp2v2 => "pvp2v2",
            BattleType::ClanMate => "clanMate",
            BattleType::Challenge => "challenge",
            BattleType::Friendly => "friendly",
            BattleType::BoatBattle => "boatBattle",
            BattleType::BoatBattlePractice => "boatBattlePractice",
            BattleType::Practice => "practice",
            BattleType::SuddenDeath => "suddenDeath",
            BattleType::Survival => "survival",
            BattleType::Tutorial => "tutorial",
            BattleType::Pve => "pve",
            BattleType::Other(tag) => tag,
        }
    }

    /// Which heuristic group this battle type belongs to.
    pub fn mode_class(&self) -> ModeClass {
        match self {
            BattleType::Pvp
            | BattleType::Trail
            | BattleType::PathOfLegend
            | BattleType::Tournament
            | BattleType::SeasonalBattle
            | BattleType::ClanWarWarDay
            | BattleType::RiverRacePvp
            | BattleType::RiverRaceDuel
            | BattleType::RiverRaceDuelColosseum
            | BattleType::ClanWarCollectionDay => ModeClass::Ranked,
            BattleType::TripleElixir
            | BattleType::DoubleElixir
            | BattleType::RampUp
            | BattleType::Casual
            | BattleType::Pvp2v2
            | BattleType::ClanMate
            | BattleType::Challenge
            | BattleType::Friendly
            | BattleType::BoatBattle
            | BattleType::BoatBattlePractice
            | BattleType::Practice => ModeClass::Fast,
            BattleType::SuddenDeath => ModeClass::SuddenDeath,
            BattleType::Survival => ModeClass::Survival,
            BattleType::Tutorial | BattleType::Pve => ModeClass::Training,
            BattleType::Other(_) => ModeClass::Unclassified,
        }
    }
}

impl From<&str> for BattleType {
    fn from(tag: &str) -> Self {
        BattleType::KNOWN
            .iter()
            .find(|known| known.as_str() == tag)
            .cloned()
            .unwrap_or_else(|| BattleType::Other(tag.to_string()))
    }
}

impl From<String> for BattleType {
    fn from(tag: String) -> Self {
        match BattleType::from(tag.as_str()) {
            BattleType::Other(_) => BattleType::Other(tag),
            known => known,
        }
    }
}

impl From<BattleType> for String {
    fn from(battle_type: BattleType) -> Self {
        match battle_type {
            BattleType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl Default for BattleType {
    fn default() -> Self {
        BattleType::Other(String::new())
    }
}

impl fmt::Display for BattleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_round_trip() {
        for known in BattleType::KNOWN.iter() {
            assert_eq!(&BattleType::from(known.as_str()), known);
        }
    }

    #[test]
    fn test_unknown_tag_is_preserved() {
        let parsed = BattleType::from("megaDraft");
        assert_eq!(parsed, BattleType::Other("megaDraft".to_string()));
        assert_eq!(parsed.as_str(), "megaDraft");
        assert_eq!(parsed.mode_class(), ModeClass::Unclassified);
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert_eq!(
            BattleType::from("PvP"),
            BattleType::Other("PvP".to_string())
        );
    }

    #[test]
    fn test_mode_class_partition() {
        let ranked = BattleType::KNOWN
            .iter()
            .filter(|t| t.mode_class() == ModeClass::Ranked)
            .count();
        let fast = BattleType::KNOWN
            .iter()
            .filter(|t| t.mode_class() == ModeClass::Fast)
            .count();

        assert_eq!(ranked, 10);
        assert_eq!(fast, 11);
        assert_eq!(BattleType::SuddenDeath.mode_class(), ModeClass::SuddenDeath);
        assert_eq!(BattleType::Survival.mode_class(), ModeClass::Survival);
        assert_eq!(BattleType::Tutorial.mode_class(), ModeClass::Training);
        assert_eq!(BattleType::Pve.mode_class(), ModeClass::Training);
    }

    #[test]
    fn test_serializes_as_tag_string() {
        let json = serde_json::to_string(&BattleType::PathOfLegend).unwrap();
        assert_eq!(json, "\"pathOfLegend\"");

        let parsed: BattleType = serde_json::from_str("\"riverRaceDuelColosseum\"").unwrap();
        assert_eq!(parsed, BattleType::RiverRaceDuelColosseum);

        let other: BattleType = serde_json::from_str("\"someNewMode\"").unwrap();
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"someNewMode\"");
    }
}
