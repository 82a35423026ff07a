//! Engine configuration.
//!
//! Loaded from an optional TOML file, then overridden by `PROBLEM_ACQUIRE_*`
//! environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scrapers::browser::BrowserEngineConfig;
use crate::scrapers::DEFAULT_USER_AGENTS;

/// Default cache TTL (7 days).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Default spacing between outbound fetches.
pub const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 5000;

/// Configuration for the acquisition engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Origin of the problem site; the GraphQL endpoint lives under it.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// How long a fetched result stays in the cache.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Minimum pause between two queued fetches, process-wide.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Per-request timeout for the HTTP strategies.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Random pre-request delay bounds for the document strategy.
    #[serde(default = "default_jitter_min_ms")]
    pub jitter_min_ms: u64,
    #[serde(default = "default_jitter_max_ms")]
    pub jitter_max_ms: u64,

    /// Identity header pool; one is drawn at random per request.
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,

    #[serde(default)]
    pub browser: BrowserEngineConfig,
}

fn default_site_url() -> String {
    "https://leetcode.com".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_min_request_interval_ms() -> u64 {
    DEFAULT_MIN_REQUEST_INTERVAL_MS
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_jitter_min_ms() -> u64 {
    1000
}

fn default_jitter_max_ms() -> u64 {
    3000
}

fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            jitter_min_ms: default_jitter_min_ms(),
            jitter_max_ms: default_jitter_max_ms(),
            user_agents: default_user_agents(),
            browser: BrowserEngineConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from an optional TOML file plus environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides()?.validated()
    }

    /// Parse a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: PathBuf::from(path),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(path),
            source,
        })
    }

    /// Apply `PROBLEM_ACQUIRE_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(val) = std::env::var("PROBLEM_ACQUIRE_SITE_URL") {
            self.site_url = val;
        }
        if let Ok(val) = std::env::var("PROBLEM_ACQUIRE_CACHE_TTL_SECS") {
            self.cache_ttl_secs = parse_u64("PROBLEM_ACQUIRE_CACHE_TTL_SECS", &val)?;
        }
        if let Ok(val) = std::env::var("PROBLEM_ACQUIRE_MIN_INTERVAL_MS") {
            self.min_request_interval_ms = parse_u64("PROBLEM_ACQUIRE_MIN_INTERVAL_MS", &val)?;
        }
        if let Ok(val) = std::env::var("PROBLEM_ACQUIRE_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs =
                parse_u64("PROBLEM_ACQUIRE_REQUEST_TIMEOUT_SECS", &val)?;
        }
        if let Ok(val) = std::env::var("PROBLEM_ACQUIRE_JITTER_MS") {
            let (min, max) = parse_range("PROBLEM_ACQUIRE_JITTER_MS", &val)?;
            self.jitter_min_ms = min;
            self.jitter_max_ms = max;
        }
        if let Ok(val) = std::env::var("PROBLEM_ACQUIRE_HEADLESS") {
            self.browser.headless = !(val == "0" || val.eq_ignore_ascii_case("false"));
        }
        if let Ok(val) = std::env::var("PROBLEM_ACQUIRE_CHROME") {
            if !val.is_empty() {
                self.browser.chrome_path = Some(PathBuf::from(val));
            }
        }
        Ok(self)
    }

    /// Reject settings the engine cannot run with.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if url::Url::parse(&self.site_url).is_err() {
            return Err(ConfigError::Invalid {
                key: "site_url",
                message: format!("not a valid URL: {}", self.site_url),
            });
        }
        if self.jitter_min_ms > self.jitter_max_ms {
            return Err(ConfigError::Invalid {
                key: "jitter_min_ms",
                message: format!(
                    "{} is greater than jitter_max_ms {}",
                    self.jitter_min_ms, self.jitter_max_ms
                ),
            });
        }
        if self.user_agents.is_empty() {
            return Err(ConfigError::Invalid {
                key: "user_agents",
                message: "at least one user agent is required".to_string(),
            });
        }
        Ok(self)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// GraphQL endpoint derived from the site URL.
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/graphql", self.site_url.trim_end_matches('/'))
    }
}

fn parse_u64(key: &'static str, val: &str) -> Result<u64, ConfigError> {
    val.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        message: format!("expected an integer, got {:?}", val),
    })
}

/// Parse `"min-max"` or a single value used for both bounds.
fn parse_range(key: &'static str, val: &str) -> Result<(u64, u64), ConfigError> {
    match val.split_once('-') {
        Some((min, max)) => Ok((parse_u64(key, min)?, parse_u64(key, max)?)),
        None => {
            let v = parse_u64(key, val)?;
            Ok((v, v))
        }
    }
}
