use crate::models::{percentage, CardWinLoss, MatchRecord, TimeWindow};

use super::in_window;

/// Win and loss percentage of matches in which `card` was played by either side.
///
/// The result is judged from the side that used the card, preferring the team
/// side when both did. Draws count toward the total but neither bucket.
pub fn card_win_loss(records: &[MatchRecord], card: &str, window: &TimeWindow) -> CardWinLoss {
    let mut total = 0u32;
    let mut victories = 0u32;
    let mut defeats = 0u32;

    for record in in_window(records, window) {
        let Some(matchup) = record.matchup() else {
            continue;
        };

        let (user, other) = if matchup.team.uses_card(card) {
            (matchup.team, matchup.opponent)
        } else if matchup.opponent.uses_card(card) {
            (matchup.opponent, matchup.team)
        } else {
            continue;
        };

        total += 1;
        if user.crowns > other.crowns {
            victories += 1;
        } else if user.crowns < other.crowns {
            defeats += 1;
        }
    }

    CardWinLoss {
        card: card.to_string(),
        total_matches: total,
        victories,
        defeats,
        win_percentage: percentage(victories, total),
        loss_percentage: percentage(defeats, total),
    }
}
