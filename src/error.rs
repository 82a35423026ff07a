//! Error types for the acquisition engine.
//!
//! Strategies return `FetchError`, but nothing here ever reaches a caller of
//! `ProblemFetcher::get_problem_details`: the strategy chain absorbs every
//! failure and degrades to the sentinel value.

use std::path::PathBuf;

use thiserror::Error;

/// Failure inside a single acquisition strategy.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),
    #[error("Browser error: {0}")]
    Browser(String),
    #[error("Browser unavailable: {0}")]
    BrowserUnavailable(String),
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Failure while loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Failure in the problem-management layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid problem URL: could not extract problem slug from {0}")]
    InvalidUrl(String),
    #[error("Failed to fetch problem details for {0}")]
    FetchFailed(String),
    #[error("Problem store error: {0}")]
    Store(String),
}

impl ServiceError {
    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::FetchFailed(_) | ServiceError::Store(_))
    }
}
