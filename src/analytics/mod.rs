//! Battle analytics engine.
//!
//! Pure, read-only passes over stored battle records:
//! - Card win/loss percentages
//! - Deck win rates above a threshold
//! - Defeats holding a card combination
//! - Fast low-trophy upset wins
//! - N-card combo win rates
//!
//! Every function takes the records to scan plus its parameters and never
//! touches storage; callers select the time window up front.

mod card_win_rate;
mod combos;
mod decks;
mod duration;
mod loss_combo;
mod upsets;

pub use card_win_rate::card_win_loss;
pub use combos::{winning_combos, DEFAULT_COMBO_WIN_RATE};
pub use decks::winning_decks;
pub use duration::{estimate_battle_duration, FAST_BATTLE_MAX_SECONDS};
pub use loss_combo::loss_combo_count;
pub use upsets::{upset_win_count, UpsetCriteria, FULL_HEALTH_TOWER_HIT_POINTS};

use crate::models::{MatchRecord, TimeWindow};

/// Records whose battle time falls inside `window`.
pub fn in_window<'a>(
    records: &'a [MatchRecord],
    window: &'a TimeWindow,
) -> impl Iterator<Item = &'a MatchRecord> + 'a {
    records
        .iter()
        .filter(move |r| window.contains(r.battle_time))
}
