//! Battle duration estimate.
//!
//! The battle log carries no duration, so it is inferred from the battle type
//! and crown counts through a fixed decision ladder.

use crate::models::{BattleType, ModeClass};

/// Longest estimate (seconds) still counted as a fast battle.
pub const FAST_BATTLE_MAX_SECONDS: u32 = 120;

/// Estimated battle length in seconds.
///
/// Branches are checked in order and the first match wins:
/// three crowns, sudden death, low-crown ranked, fast modes, survival,
/// tutorial/PvE, then the 180s fallback.
pub fn estimate_battle_duration(
    battle_type: &BattleType,
    team_crowns: u8,
    opponent_crowns: u8,
) -> u32 {
    let max_crowns = team_crowns.max(opponent_crowns);
    let total_crowns = team_crowns as u32 + opponent_crowns as u32;
    let class = battle_type.mode_class();

    if max_crowns == 3 {
        return 90;
    }
    if class == ModeClass::SuddenDeath {
        return 60;
    }
    if total_crowns <= 1 && class == ModeClass::Ranked {
        return 240;
    }

    match class {
        ModeClass::Fast => 120,
        ModeClass::Survival => 300,
        ModeClass::Training => 120,
        ModeClass::Ranked | ModeClass::SuddenDeath | ModeClass::Unclassified => 180,
    }
}
