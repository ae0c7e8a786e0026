//! # Royale Meta
//!
//! Clash Royale leaderboard ingestion and battle analytics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, decks, player snapshots)
//! - **analytics**: Win rates, deck and combo rankings, upset detection
//! - **fetch**: Authenticated JSON fetching with raw response archiving
//! - **sync**: Leaderboard ingestion from the upstream API
//! - **storage**: Filesystem player store (JSONL)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod analytics;
pub mod api;
pub mod config;
pub mod fetch;
pub mod models;
pub mod storage;
pub mod sync;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    Some(Duration::from_secs(num * multiplier))
}
