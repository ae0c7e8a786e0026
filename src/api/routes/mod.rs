pub mod analytics;
pub mod players;
pub mod refresh;

use std::str::FromStr;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::state::AppState;
use super::ApiError;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/players", get(players::list))
        .route("/api/analytics/card-win-rate", get(analytics::card_win_rate))
        .route("/api/analytics/decks", get(analytics::decks))
        .route("/api/analytics/loss-combo", get(analytics::loss_combo))
        .route("/api/analytics/upset-wins", get(analytics::upset_wins))
        .route("/api/analytics/combos", get(analytics::combos))
        .route("/api/refresh", post(refresh::start))
        .route("/api/refresh/status", get(refresh::status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return base.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => base.allow_origin(value),
        Err(_) => {
            warn!("Ignoring invalid CORS origin {:?}", origin);
            base
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Parse an optional query value, treating blank as absent.
pub(crate) fn parse_param<T: FromStr>(value: Option<&str>, name: &str) -> Result<Option<T>, ApiError> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("invalid `{}`: {}", name, raw))),
    }
}

pub(crate) fn require_param<T: FromStr>(value: Option<&str>, name: &str) -> Result<T, ApiError> {
    parse_param(value, name)?.ok_or_else(|| ApiError::BadRequest(format!("missing `{}`", name)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::state::AppState;
    use crate::models::{CardRef, MatchRecord, PlayerSnapshot, SideEntry};
    use crate::storage::{PlayerStore, StorageConfig};
    use crate::sync::source::MockSource;
    use crate::sync::{SyncConfig, SyncOrchestrator};

    pub fn side(crowns: u8, cards: &[&str]) -> SideEntry {
        SideEntry::new(crowns, cards.iter().map(|c| CardRef::new(*c)).collect())
    }

    pub fn setup_state(dir: &std::path::Path, source: MockSource) -> AppState {
        let store = PlayerStore::new(StorageConfig::new(dir.to_path_buf()));
        let orchestrator = SyncOrchestrator::new(SyncConfig::default(), Arc::new(source), store.clone());
        AppState {
            store: Arc::new(store),
            orchestrator: Arc::new(orchestrator),
            cors_origin: "*".to_string(),
        }
    }

    pub fn seed(state: &AppState, tag: &str, battles: Vec<MatchRecord>) {
        state
            .store
            .upsert(PlayerSnapshot::new(tag, format!("Player {}", tag)).with_battles(battles))
            .unwrap();
    }

    pub async fn request_json(app: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        request_json(app, "GET", uri).await
    }
}
