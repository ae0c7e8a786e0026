use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::PlayerSnapshot;

#[derive(Debug, Serialize)]
pub struct PlayerSummary {
    pub tag: String,
    pub name: String,
    pub trophies: Option<u32>,
    pub clan: Option<String>,
    pub battles: usize,
    pub refreshed_at: DateTime<Utc>,
}

impl From<&PlayerSnapshot> for PlayerSummary {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            tag: p.tag.clone(),
            name: p.name.clone(),
            trophies: p.trophies,
            clan: p.clan.as_ref().map(|c| c.name.clone()),
            battles: p.battles.len(),
            refreshed_at: p.refreshed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub total_players: usize,
    pub total_battles: usize,
    pub players: Vec<PlayerSummary>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<PlayersResponse>, ApiError> {
    let mut players: Vec<PlayerSummary> = state.store.all()?.iter().map(PlayerSummary::from).collect();
    players.sort_by(|a, b| b.trophies.cmp(&a.trophies).then_with(|| a.tag.cmp(&b.tag)));

    Ok(Json(PlayersResponse {
        total_players: players.len(),
        total_battles: players.iter().map(|p| p.battles).sum(),
        players,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::test_support::*;
    use crate::models::{BattleType, MatchRecord, PlayerSnapshot};
    use crate::sync::source::MockSource;
    use axum::http::StatusCode;
    use chrono::Utc;

    #[tokio::test]
    async fn test_players_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_state(tmp.path(), MockSource::default()));

        let (status, json) = get_json(app, "/api/players").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_players"], 0);
        assert_eq!(json["players"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_players_sorted_by_trophies() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_state(tmp.path(), MockSource::default());

        let battle = MatchRecord::new(Utc::now(), BattleType::Pvp, side(1, &[]), side(0, &[]));
        let mut low = PlayerSnapshot::new("#LOW", "Low").with_battles(vec![battle.clone()]);
        low.trophies = Some(5000);
        let mut high = PlayerSnapshot::new("#HIGH", "High").with_battles(vec![battle.clone(), battle]);
        high.trophies = Some(9000);
        state.store.upsert_many(vec![low, high]).unwrap();

        let (status, json) = get_json(build_router(state), "/api/players").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_players"], 2);
        assert_eq!(json["total_battles"], 3);
        assert_eq!(json["players"][0]["tag"], "#HIGH");
        assert_eq!(json["players"][0]["battles"], 2);
    }
}
