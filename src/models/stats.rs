//! Analytic result models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DeckKey;

/// Closed time interval; an absent bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// The window covering all time.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| t >= from) && self.to.map_or(true, |to| t <= to)
    }

    /// True when both bounds are set and `from` is after `to`.
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

/// Percentage of `part` in `total`, or `None` when there is nothing to divide by.
pub fn percentage(part: u32, total: u32) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64 * 100.0)
    }
}

/// Win/loss split for matches featuring a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardWinLoss {
    pub card: String,
    pub total_matches: u32,
    pub victories: u32,
    pub defeats: u32,
    /// `None` when no match featured the card
    pub win_percentage: Option<f64>,
    pub loss_percentage: Option<f64>,
}

/// Aggregated record of a deck or card combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckWinRate {
    pub deck: DeckKey,
    pub victories: u32,
    pub total: u32,
    pub win_rate: f64,
}

impl DeckWinRate {
    pub fn new(deck: DeckKey, victories: u32, total: u32) -> Self {
        Self {
            deck,
            victories,
            total,
            win_rate: percentage(victories, total).unwrap_or(0.0),
        }
    }
}

/// Defeats suffered while holding a given card combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossComboCount {
    pub cards: Vec<String>,
    pub defeats_with_combo: u32,
}

/// Count of fast upset wins with a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsetWinCount {
    pub card: String,
    pub percentage: f64,
    pub victory_count: u32,
}

/// Sort best first: win rate, then sample size, then key.
pub fn rank_by_win_rate(rows: &mut [DeckWinRate]) {
    rows.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.total.cmp(&a.total))
            .then_with(|| a.deck.cmp(&b.deck))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_is_closed() {
        let window = TimeWindow::new(at(1), at(10));
        assert!(window.contains(at(1)));
        assert!(window.contains(at(10)));
        assert!(window.contains(at(5)));
        assert!(!window.contains(at(11)));
    }

    #[test]
    fn test_half_open_windows() {
        let from_only = TimeWindow {
            from: Some(at(5)),
            to: None,
        };
        assert!(!from_only.contains(at(4)));
        assert!(from_only.contains(at(30)));

        assert!(TimeWindow::unbounded().contains(at(1)));
    }

    #[test]
    fn test_inverted_window() {
        assert!(TimeWindow::new(at(10), at(1)).is_inverted());
        assert!(!TimeWindow::new(at(1), at(10)).is_inverted());
        assert!(!TimeWindow::unbounded().is_inverted());
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 2), Some(50.0));
        assert_eq!(percentage(0, 0), None);
        assert_eq!(percentage(0, 4), Some(0.0));
    }

    #[test]
    fn test_rank_by_win_rate() {
        let mut rows = vec![
            DeckWinRate::new(DeckKey::from_names(["A"]), 1, 2),
            DeckWinRate::new(DeckKey::from_names(["B"]), 3, 3),
            DeckWinRate::new(DeckKey::from_names(["C"]), 2, 4),
        ];
        rank_by_win_rate(&mut rows);

        let order: Vec<&str> = rows.iter().map(|r| r.deck.cards()[0].as_str()).collect();
        // Equal 50% rates fall back to the larger sample first
        assert_eq!(order, vec!["B", "C", "A"]);
    }
}
