use std::collections::HashMap;

use crate::models::{rank_by_win_rate, DeckKey, DeckWinRate, MatchRecord, Outcome, TimeWindow};

use super::in_window;

/// Win rate threshold used when the caller does not pass one.
pub const DEFAULT_COMBO_WIN_RATE: f64 = 60.0;

/// Every `combo_size`-card subset of team decks with its aggregate win rate,
/// keeping those at or above `min_win_rate`, best first.
pub fn winning_combos(
    records: &[MatchRecord],
    combo_size: usize,
    min_win_rate: f64,
    window: &TimeWindow,
) -> Vec<DeckWinRate> {
    let mut stats: HashMap<DeckKey, (u32, u32)> = HashMap::new();

    for record in in_window(records, window) {
        let Some(matchup) = record.matchup() else {
            continue;
        };
        let won = matchup.outcome() == Outcome::TeamWin;
        let deck = DeckKey::from_names(matchup.team.card_names());

        for combo in deck.combinations(combo_size) {
            let entry = stats.entry(combo).or_default();
            entry.1 += 1;
            if won {
                entry.0 += 1;
            }
        }
    }

    let mut rows: Vec<DeckWinRate> = stats
        .into_iter()
        .map(|(combo, (victories, total))| DeckWinRate::new(combo, victories, total))
        .filter(|row| row.win_rate >= min_win_rate)
        .collect();
    rank_by_win_rate(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;

    const DECK: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

    #[test]
    fn test_pairs_from_one_deck() {
        let records = vec![record(1, side(1, &DECK), side(0, &[]))];

        let combos = winning_combos(&records, 2, 0.0, &TimeWindow::unbounded());
        assert_eq!(combos.len(), 28);
        assert!(combos.iter().all(|c| c.total == 1 && c.win_rate == 100.0));
    }

    #[test]
    fn test_threshold_and_order() {
        let records = vec![
            record(1, side(1, &["A", "B", "C"]), side(0, &[])),
            record(2, side(0, &["A", "B", "D"]), side(1, &[])),
            record(3, side(2, &["A", "C"]), side(1, &[])),
        ];

        let combos = winning_combos(&records, 2, 60.0, &TimeWindow::unbounded());
        let keys: Vec<Vec<String>> = combos.iter().map(|c| c.deck.cards().to_vec()).collect();

        // A|C won twice out of two, B|C once out of once; A|B only 50%
        assert_eq!(
            keys,
            vec![
                vec!["A".to_string(), "C".to_string()],
                vec!["B".to_string(), "C".to_string()],
            ]
        );
        assert_eq!(combos[0].total, 2);
        assert_eq!(combos[0].victories, 2);
    }

    #[test]
    fn test_default_threshold_filters_losers() {
        let records = vec![
            record(1, side(1, &["A", "B"]), side(0, &[])),
            record(2, side(0, &["A", "B"]), side(1, &[])),
        ];

        let combos = winning_combos(
            &records,
            2,
            DEFAULT_COMBO_WIN_RATE,
            &TimeWindow::unbounded(),
        );
        assert!(combos.is_empty());
    }

    #[test]
    fn test_combo_larger_than_deck_yields_nothing() {
        let records = vec![record(1, side(1, &["A", "B"]), side(0, &[]))];
        assert!(winning_combos(&records, 3, 0.0, &TimeWindow::unbounded()).is_empty());
    }

    #[test]
    fn test_draws_count_against_combo() {
        let records = vec![record(1, side(1, &["A"]), side(1, &[]))];
        let combos = winning_combos(&records, 1, 0.0, &TimeWindow::unbounded());
        assert_eq!(combos[0].victories, 0);
        assert_eq!(combos[0].total, 1);
    }
}
