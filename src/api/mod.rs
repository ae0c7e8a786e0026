//! REST API endpoints.
//!
//! Axum-based HTTP API for querying stored battles, running the
//! analytics, and triggering ingestion.

pub mod routes;
pub mod state;

pub use routes::build_router;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::models::{parse_time_bound, TimeWindow};
use crate::storage::StorageError;
use crate::sync::SyncError;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        error!("Storage error: {}", e);
        ApiError::Internal(e.to_string())
    }
}

impl From<SyncError> for ApiError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::LeaderboardNotFound(name) => {
                ApiError::NotFound(format!("leaderboard {:?}", name))
            }
            SyncError::AlreadyRunning => ApiError::Conflict(e.to_string()),
            SyncError::Fetch(_) | SyncError::Storage(_) => ApiError::Internal(e.to_string()),
        }
    }
}

/// Optional `from`/`to` query bounds shared by every analytics endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowParams {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl WindowParams {
    /// Parse into a closed window. A bare `to` date covers that whole day.
    pub fn window(&self) -> Result<TimeWindow, ApiError> {
        let bound = |value: &Option<String>, name: &str, end_of_day: bool| {
            value
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(|s| {
                    parse_time_bound(s, end_of_day)
                        .map_err(|_| ApiError::BadRequest(format!("invalid `{}` date: {}", name, s)))
                })
                .transpose()
        };

        let window = TimeWindow {
            from: bound(&self.from, "from", false)?,
            to: bound(&self.to, "to", true)?,
        };

        if window.is_inverted() {
            return Err(ApiError::BadRequest("`from` is after `to`".to_string()));
        }
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn params(from: Option<&str>, to: Option<&str>) -> WindowParams {
        WindowParams {
            from: from.map(String::from),
            to: to.map(String::from),
        }
    }

    #[test]
    fn test_window_unbounded() {
        assert_eq!(params(None, None).window().unwrap(), TimeWindow::unbounded());
        assert_eq!(
            params(Some(""), Some("  ")).window().unwrap(),
            TimeWindow::unbounded()
        );
    }

    #[test]
    fn test_window_date_only_to_covers_day() {
        let window = params(Some("2025-04-01"), Some("2025-04-10")).window().unwrap();
        assert_eq!(
            window.from,
            Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap())
        );
        assert!(window.contains(Utc.with_ymd_and_hms(2025, 4, 10, 23, 59, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2025, 4, 11, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_window_accepts_battle_timestamps() {
        let window = params(Some("20250401T000000.000Z"), Some("2025-04-02T12:00:00Z"))
            .window()
            .unwrap();
        assert_eq!(
            window.to,
            Some(Utc.with_ymd_and_hms(2025, 4, 2, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_window_rejects_garbage() {
        assert!(matches!(
            params(Some("last week"), None).window(),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_window_rejects_inverted() {
        assert!(matches!(
            params(Some("2025-04-10"), Some("2025-04-01")).window(),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_sync_error_mapping() {
        assert!(matches!(
            ApiError::from(SyncError::LeaderboardNotFound("Retro Royale".into())),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(SyncError::AlreadyRunning),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(SyncError::Storage(StorageError::InvalidPath("x".into()))),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_error_response_status() {
        let resp = ApiError::Conflict("busy".into()).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = ApiError::BadRequest("n".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
