use crate::models::{DeckKey, LossComboCount, MatchRecord, Outcome, TimeWindow};

use super::in_window;

/// Number of strict team defeats whose deck held every card in `cards`.
pub fn loss_combo_count(
    records: &[MatchRecord],
    cards: &[String],
    window: &TimeWindow,
) -> LossComboCount {
    let defeats = in_window(records, window)
        .filter_map(|r| r.matchup())
        .filter(|m| m.outcome() == Outcome::OpponentWin)
        .filter(|m| DeckKey::from_names(m.team.card_names()).contains_all(cards))
        .count() as u32;

    LossComboCount {
        cards: cards.to_vec(),
        defeats_with_combo: defeats,
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    fn combo(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_counts_only_defeats_with_superset_deck() {
        let records = vec![
            record(1, side(0, &["Zap", "Bandit", "Miner"]), side(1, &[])),
            record(2, side(0, &["Zap", "Miner"]), side(1, &[])),
            record(3, side(2, &["Zap", "Bandit"]), side(1, &[])),
            record(4, side(1, &["Bandit", "Zap"]), side(1, &[])),
        ];

        let result = loss_combo_count(&records, &combo(&["Zap", "Bandit"]), &TimeWindow::unbounded());
        assert_eq!(result.defeats_with_combo, 1);
        assert_eq!(result.cards, combo(&["Zap", "Bandit"]));
    }

    #[test]
    fn test_full_deck_is_its_own_subset() {
        let deck = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let records = vec![record(1, side(0, &deck), side(3, &[]))];

        let result = loss_combo_count(&records, &combo(&deck), &TimeWindow::unbounded());
        assert_eq!(result.defeats_with_combo, 1);
    }

    #[test]
    fn test_missing_team_cards_only_match_empty_combo() {
        let records = vec![record(1, side(0, &[]), side(1, &["Zap"]))];

        let window = TimeWindow::unbounded();
        assert_eq!(
            loss_combo_count(&records, &combo(&["Zap"]), &window).defeats_with_combo,
            0
        );
        assert_eq!(loss_combo_count(&records, &[], &window).defeats_with_combo, 1);
    }

    #[test]
    fn test_respects_window() {
        let records = vec![
            record(1, side(0, &["Zap"]), side(1, &[])),
            record(15, side(0, &["Zap"]), side(1, &[])),
        ];

        let result = loss_combo_count(&records, &combo(&["Zap"]), &TimeWindow::new(day(10), day(20)));
        assert_eq!(result.defeats_with_combo, 1);
    }
}
