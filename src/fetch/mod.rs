//! Authenticated JSON fetching.
//!
//! Every successful response body is archived under the raw data directory
//! before it is decoded, so upstream payloads can be re-processed later.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Rejected credentials for {host} (HTTP {status})")]
    Unauthorized { host: String, status: u16 },

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Metadata stored alongside an archived response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub content_type: Option<String>,
    pub content_length: usize,
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Directory for archived responses; `None` disables archiving
    pub archive_dir: Option<PathBuf>,

    /// Maximum response size (default 10MB)
    pub max_content_size: usize,

    pub timeout: Duration,

    pub user_agent: String,

    /// Sent as `Authorization: Bearer <token>`
    pub bearer_token: Option<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            archive_dir: Some(PathBuf::from("./data/raw")),
            max_content_size: 10 * 1024 * 1024,
            timeout: Duration::from_secs(30),
            user_agent: format!("royale-meta/{}", env!("CARGO_PKG_VERSION")),
            bearer_token: None,
        }
    }
}

/// HTTP JSON client.
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("royale-meta")),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = config.bearer_token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| {
                    FetchError::InvalidHeader("API token contains invalid characters".to_string())
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// GET `url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let body = self.get_bytes(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        info!("Fetching {}", url);
        let host = url.host_str().unwrap_or("unknown").to_string();

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FetchError::Unauthorized {
                host,
                status: status.as_u16(),
            });
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host,
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let content = response.bytes().await?;
        if content.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size: content.len(),
                max_size: self.config.max_content_size,
            });
        }

        if let Some(dir) = &self.config.archive_dir {
            self.archive(dir, url, &content, content_type).await?;
        }

        Ok(content.to_vec())
    }

    async fn archive(
        &self,
        dir: &Path,
        url: &Url,
        content: &[u8],
        content_type: Option<String>,
    ) -> Result<(), FetchError> {
        let body_path = Self::archive_path(dir, url, "json");
        let meta_path = Self::archive_path(dir, url, "meta.json");

        if let Some(parent) = body_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&body_path, content).await?;

        let meta = ArchiveMetadata {
            url: url.to_string(),
            fetched_at: Utc::now(),
            content_type,
            content_length: content.len(),
        };
        fs::write(&meta_path, serde_json::to_string_pretty(&meta)?).await?;

        debug!("Archived {} to {:?}", url, body_path);
        Ok(())
    }

    /// `<dir>/<host>/<hash>.<extension>`
    fn archive_path(dir: &Path, url: &Url, extension: &str) -> PathBuf {
        let host = url.host_str().unwrap_or("unknown");
        dir.join(host)
            .join(format!("{}.{}", Self::url_hash(url), extension))
    }

    /// Hash a URL to a short string.
    fn url_hash(url: &Url) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}
