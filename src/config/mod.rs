//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Upstream API and ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoyaleConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub api_token_env: String,

    /// Resolved from `api_token_env`, never written to disk
    #[serde(skip)]
    pub api_token: Option<String>,

    #[serde(default = "default_leaderboard_name")]
    pub leaderboard_name: String,

    #[serde(default = "default_player_limit")]
    pub player_limit: usize,

    #[serde(default = "default_battle_limit")]
    pub battle_limit: usize,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Interval for `sync --watch` (e.g. "6h", "30m")
    #[serde(default = "default_sync_interval")]
    pub sync_interval: String,
}

fn default_base_url() -> String {
    crate::sync::royale::DEFAULT_API_BASE.to_string()
}

fn default_token_env() -> String {
    "CLASH_ROYALE_API".to_string()
}

fn default_leaderboard_name() -> String {
    "Retro Royale".to_string()
}

fn default_player_limit() -> usize {
    10
}

fn default_battle_limit() -> usize {
    20
}

fn default_timeout() -> u64 {
    30
}

fn default_sync_interval() -> String {
    "6h".to_string()
}

impl Default for RoyaleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token_env: default_token_env(),
            api_token: None,
            leaderboard_name: default_leaderboard_name(),
            player_limit: default_player_limit(),
            battle_limit: default_battle_limit(),
            timeout_seconds: default_timeout(),
            sync_interval: default_sync_interval(),
        }
    }
}

impl RoyaleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn interval(&self) -> Option<Duration> {
        crate::parse_duration(&self.sync_interval)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub royale: RoyaleConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            royale: RoyaleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise defaults; then apply the
    /// environment (including a `.env` file when present).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            debug!("No config file at {:?}, using defaults", path);
            Self::default()
        };

        if let Ok(env_file) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", env_file);
        }
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Fill in the API token and `PORT` override from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.royale.api_token = lookup(&self.royale.api_token_env).filter(|t| !t.is_empty());

        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.royale.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.royale.leaderboard_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Leaderboard name must not be empty".to_string(),
            ));
        }

        if self.royale.player_limit == 0 || self.royale.battle_limit == 0 {
            return Err(ConfigError::ValidationError(
                "Player and battle limits must be greater than 0".to_string(),
            ));
        }

        if self.royale.interval().map_or(true, |d| d.is_zero()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid sync interval: {:?}",
                self.royale.sync_interval
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
