use serde::{Deserialize, Serialize};

use crate::models::{MatchRecord, SideEntry, TimeWindow, UpsetWinCount};

use super::{estimate_battle_duration, in_window, FAST_BATTLE_MAX_SECONDS};

/// Princess tower hit points at full health, one per tower level.
pub const FULL_HEALTH_TOWER_HIT_POINTS: [u32; 15] = [
    1400, 1512, 1624, 1750, 1890, 2030, 2184, 2352, 2534, 2786, 3052, 3346, 3668, 4032, 4424,
];

/// Loser crowns needed for an upset to qualify.
const MIN_LOSER_CROWNS: u8 = 2;

/// Parameters of the upset-win query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsetCriteria {
    pub card: String,

    /// Minimum trophy deficit of the winner, in percent of the loser's trophies
    pub percentage: f64,

    /// Also require the loser to report two full-health princess towers
    #[serde(default)]
    pub require_full_health_towers: bool,
}

impl UpsetCriteria {
    pub fn new(card: impl Into<String>, percentage: f64) -> Self {
        Self {
            card: card.into(),
            percentage,
            require_full_health_towers: false,
        }
    }

    pub fn with_full_health_towers(mut self) -> Self {
        self.require_full_health_towers = true;
        self
    }

    fn trophy_gap_met(&self, winner: &SideEntry, loser: &SideEntry) -> bool {
        match (winner.starting_trophies, loser.starting_trophies) {
            (Some(w), Some(l)) => w as f64 <= l as f64 * (1.0 - self.percentage / 100.0),
            _ => false,
        }
    }
}

fn has_two_full_health_towers(side: &SideEntry) -> bool {
    match side.princess_towers_hit_points.as_deref() {
        Some([first, second, ..]) => {
            FULL_HEALTH_TOWER_HIT_POINTS.contains(first)
                && FULL_HEALTH_TOWER_HIT_POINTS.contains(second)
        }
        _ => false,
    }
}

/// Count fast wins where a lower-trophy winner used the card and the loser
/// still took at least two crowns.
///
/// Records without a winner or without starting trophies on both sides never
/// qualify.
pub fn upset_win_count(
    records: &[MatchRecord],
    criteria: &UpsetCriteria,
    window: &TimeWindow,
) -> UpsetWinCount {
    let victory_count = in_window(records, window)
        .filter(|record| {
            let Some(matchup) = record.matchup() else {
                return false;
            };
            let Some((winner, loser)) = matchup.winner_and_loser() else {
                return false;
            };

            let duration = estimate_battle_duration(
                &record.battle_type,
                matchup.team.crowns,
                matchup.opponent.crowns,
            );

            duration <= FAST_BATTLE_MAX_SECONDS
                && loser.crowns >= MIN_LOSER_CROWNS
                && winner.uses_card(&criteria.card)
                && criteria.trophy_gap_met(winner, loser)
                && (!criteria.require_full_health_towers || has_two_full_health_towers(loser))
        })
        .count() as u32;

    UpsetWinCount {
        card: criteria.card.clone(),
        percentage: criteria.percentage,
        victory_count,
    }
}
