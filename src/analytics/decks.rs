use std::collections::HashMap;

use crate::models::{rank_by_win_rate, DeckKey, DeckWinRate, MatchRecord, Outcome, TimeWindow};

use super::in_window;

/// Team decks whose win rate is at least `min_win_rate` percent.
///
/// Draws count as losses here. Records without team cards are skipped.
pub fn winning_decks(
    records: &[MatchRecord],
    min_win_rate: f64,
    window: &TimeWindow,
) -> Vec<DeckWinRate> {
    // deck -> (victories, total)
    let mut groups: HashMap<DeckKey, (u32, u32)> = HashMap::new();

    for record in in_window(records, window) {
        let Some(matchup) = record.matchup() else {
            continue;
        };
        let deck = DeckKey::from_names(matchup.team.card_names());
        if deck.is_empty() {
            continue;
        }

        let entry = groups.entry(deck).or_default();
        entry.1 += 1;
        if matchup.outcome() == Outcome::TeamWin {
            entry.0 += 1;
        }
    }

    let mut rows: Vec<DeckWinRate> = groups
        .into_iter()
        .map(|(deck, (victories, total))| DeckWinRate::new(deck, victories, total))
        .filter(|row| row.win_rate >= min_win_rate)
        .collect();
    rank_by_win_rate(&mut rows);
    rows
}
