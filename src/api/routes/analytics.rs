use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::analytics::{
    card_win_loss, loss_combo_count, upset_win_count, winning_combos, winning_decks,
    UpsetCriteria, DEFAULT_COMBO_WIN_RATE,
};
use crate::api::state::AppState;
use crate::api::{ApiError, WindowParams};
use crate::models::{
    CardWinLoss, DeckWinRate, LossComboCount, MatchRecord, TimeWindow, UpsetWinCount,
};

use super::{parse_param, require_param};

/// Stored battles inside the query window.
fn load(state: &AppState, window: &WindowParams) -> Result<(Vec<MatchRecord>, TimeWindow), ApiError> {
    let window = window.window()?;
    let records = state.store.battles(&window)?;
    Ok((records, window))
}

fn require_card(card: Option<&str>) -> Result<String, ApiError> {
    card.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .ok_or_else(|| ApiError::BadRequest("missing `card`".to_string()))
}

// ── Card win rate ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CardParams {
    pub card: Option<String>,
}

pub async fn card_win_rate(
    State(state): State<AppState>,
    Query(params): Query<CardParams>,
    Query(window): Query<WindowParams>,
) -> Result<Json<CardWinLoss>, ApiError> {
    let card = require_card(params.card.as_deref())?;
    let (records, window) = load(&state, &window)?;
    Ok(Json(card_win_loss(&records, &card, &window)))
}

// ── Winning decks ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ThresholdParams {
    pub min_win_rate: Option<String>,
}

pub async fn decks(
    State(state): State<AppState>,
    Query(params): Query<ThresholdParams>,
    Query(window): Query<WindowParams>,
) -> Result<Json<Vec<DeckWinRate>>, ApiError> {
    let min_win_rate: f64 = parse_param(params.min_win_rate.as_deref(), "min_win_rate")?.unwrap_or(0.0);
    let (records, window) = load(&state, &window)?;
    Ok(Json(winning_decks(&records, min_win_rate, &window)))
}

// ── Loss combo ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LossComboParams {
    /// Comma-separated card names
    pub cards: Option<String>,
}

/// `"Zap, Bandit,"` → `["Zap", "Bandit"]`
fn split_cards(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

pub async fn loss_combo(
    State(state): State<AppState>,
    Query(params): Query<LossComboParams>,
    Query(window): Query<WindowParams>,
) -> Result<Json<LossComboCount>, ApiError> {
    let cards = split_cards(params.cards.as_deref());
    let (records, window) = load(&state, &window)?;
    Ok(Json(loss_combo_count(&records, &cards, &window)))
}

// ── Upset wins ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpsetParams {
    pub card: Option<String>,
    pub percentage: Option<String>,
    pub full_health_towers: Option<String>,
}

pub async fn upset_wins(
    State(state): State<AppState>,
    Query(params): Query<UpsetParams>,
    Query(window): Query<WindowParams>,
) -> Result<Json<UpsetWinCount>, ApiError> {
    let card = require_card(params.card.as_deref())?;
    let percentage: f64 = require_param(params.percentage.as_deref(), "percentage")?;
    let full_health: bool =
        parse_param(params.full_health_towers.as_deref(), "full_health_towers")?.unwrap_or(false);

    let mut criteria = UpsetCriteria::new(card, percentage);
    if full_health {
        criteria = criteria.with_full_health_towers();
    }

    let (records, window) = load(&state, &window)?;
    Ok(Json(upset_win_count(&records, &criteria, &window)))
}

// ── Winning combos ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ComboParams {
    pub n: Option<String>,
    pub min_win_rate: Option<String>,
}

pub async fn combos(
    State(state): State<AppState>,
    Query(params): Query<ComboParams>,
    Query(window): Query<WindowParams>,
) -> Result<Json<Vec<DeckWinRate>>, ApiError> {
    let n: usize = require_param(params.n.as_deref(), "n")?;
    if n == 0 {
        return Err(ApiError::BadRequest("`n` must be at least 1".to_string()));
    }
    let min_win_rate: f64 =
        parse_param(params.min_win_rate.as_deref(), "min_win_rate")?.unwrap_or(DEFAULT_COMBO_WIN_RATE);

    let (records, window) = load(&state, &window)?;
    Ok(Json(winning_combos(&records, n, min_win_rate, &window)))
}
