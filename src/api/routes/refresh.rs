use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::sync::{SyncResult, SyncState};

/// Run one ingestion and return its result once it finishes.
pub async fn start(State(state): State<AppState>) -> Result<Json<SyncResult>, ApiError> {
    info!("Refresh requested over HTTP");
    let result = state.orchestrator.sync_once().await?;
    Ok(Json(result))
}

pub async fn status(State(state): State<AppState>) -> Json<SyncState> {
    Json(state.orchestrator.state().await)
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::test_support::*;
    use crate::sync::source::{LeaderboardEntry, MockSource, RawBattle, RawParticipant};
    use axum::http::StatusCode;

    fn source() -> MockSource {
        MockSource::with_leaderboard(
            "Retro Royale",
            vec![LeaderboardEntry {
                tag: "#A".to_string(),
                name: "Alice".to_string(),
                ..Default::default()
            }],
        )
        .with_battle_log(
            "#A",
            vec![RawBattle {
                battle_time: "20250411T220846.000Z".to_string(),
                battle_type: Some("pvp".to_string()),
                team: vec![RawParticipant {
                    crowns: Some(1),
                    ..Default::default()
                }],
                opponent: vec![RawParticipant::default()],
                ..Default::default()
            }],
        )
    }

    #[tokio::test]
    async fn test_refresh_runs_sync() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_state(tmp.path(), source());
        let app = build_router(state.clone());

        let (status, json) = request_json(app.clone(), "POST", "/api/refresh").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["players_synced"], 1);
        assert_eq!(json["battles_stored"], 1);

        let (_, json) = get_json(app.clone(), "/api/players").await;
        assert_eq!(json["total_players"], 1);

        let (status, json) = get_json(app, "/api/refresh/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["last_sync_status"], "completed");
    }

    #[tokio::test]
    async fn test_refresh_leaderboard_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let state = setup_state(
            tmp.path(),
            MockSource::with_leaderboard("Ladder", Vec::new()),
        );
        seed(&state, "#OLD", Vec::new());
        let app = build_router(state);

        let (status, json) = request_json(app.clone(), "POST", "/api/refresh").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");

        let (_, json) = get_json(app, "/api/players").await;
        assert_eq!(json["total_players"], 0);
    }

    #[tokio::test]
    async fn test_refresh_upstream_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let mut source = source();
        source.failing_tag = Some("#A".to_string());
        let app = build_router(setup_state(tmp.path(), source));

        let (status, json) = request_json(app, "POST", "/api/refresh").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }

    #[tokio::test]
    async fn test_refresh_status_idle() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_state(tmp.path(), MockSource::default()));

        let (status, json) = get_json(app, "/api/refresh/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["last_sync_status"], "idle");
    }
}
