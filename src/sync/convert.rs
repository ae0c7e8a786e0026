//! Convert upstream payloads to stored model entities.
//!
//! Bridges between the raw API shapes (camelCase, mostly optional) and the
//! stored snapshot types.

use chrono::Utc;
use tracing::warn;

use super::source::{RawBattle, RawCard, RawClan, RawParticipant, RawPlayer};
use crate::models::{
    parse_battle_time, BattleTimeError, BattleType, CardRef, Clan, MatchRecord, PlayerSnapshot,
    SideEntry,
};

fn card(raw: RawCard) -> CardRef {
    CardRef {
        name: raw.name,
        level: raw.level,
        max_level: raw.max_level,
        icon_url: raw.icon_urls.and_then(|u| u.medium).unwrap_or_default(),
    }
}

fn clan(raw: RawClan) -> Clan {
    Clan {
        tag: raw.tag,
        name: raw.name,
        badge_id: raw.badge_id,
    }
}

fn side(raw: RawParticipant) -> SideEntry {
    SideEntry {
        crowns: raw.crowns.unwrap_or(0),
        cards: raw.cards.into_iter().map(card).collect(),
        starting_trophies: raw.starting_trophies,
        princess_towers_hit_points: raw.princess_towers_hit_points,
    }
}

/// Convert one battle log entry.
///
/// Fails only when the battle timestamp cannot be parsed.
pub fn match_record(raw: RawBattle) -> Result<MatchRecord, BattleTimeError> {
    let battle_time = parse_battle_time(&raw.battle_time)?;

    Ok(MatchRecord {
        battle_time,
        battle_type: raw
            .battle_type
            .map(BattleType::from)
            .unwrap_or_default(),
        team: raw.team.into_iter().map(side).collect(),
        opponent: raw.opponent.into_iter().map(side).collect(),
        game_mode: raw.game_mode,
        is_ladder_tournament: raw.is_ladder_tournament,
        arena: raw.arena,
    })
}

/// Build a snapshot from a profile and its battle log.
///
/// Keeps the first `battle_limit` log entries; entries with an unreadable
/// timestamp are dropped.
pub fn player_snapshot(
    profile: RawPlayer,
    battle_log: Vec<RawBattle>,
    battle_limit: usize,
) -> PlayerSnapshot {
    let tag = profile.tag.clone();
    let battles = battle_log
        .into_iter()
        .take(battle_limit)
        .filter_map(|raw| match match_record(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping battle for {}: {}", tag, e);
                None
            }
        })
        .collect();

    PlayerSnapshot {
        tag: profile.tag,
        name: profile.name,
        exp_level: profile.exp_level,
        trophies: profile.trophies,
        best_trophies: profile.best_trophies,
        battle_count: profile.battle_count,
        wins: profile.wins,
        losses: profile.losses,
        three_crown_wins: profile.three_crown_wins,
        clan: profile.clan.map(clan),
        arena: profile.arena,
        current_deck: profile.current_deck.into_iter().map(card).collect(),
        cards: profile.cards.into_iter().map(card).collect(),
        battles,
        refreshed_at: Utc::now(),
    }
}
