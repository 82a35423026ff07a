//! Browser strategy configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Headless browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEngineConfig {
    /// Run in headless mode (default: true).
    /// Set to false for debugging or if headless detection is an issue.
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Chrome/Chromium executable. Auto-detected when unset.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,

    /// Page navigation timeout in seconds.
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout_secs: u64,

    /// How long to wait for the title element before extracting anyway.
    #[serde(default = "default_selector_timeout")]
    pub selector_timeout_secs: u64,

    /// Random pause before navigation, in milliseconds.
    #[serde(default = "default_settle_min_ms")]
    pub settle_min_ms: u64,
    #[serde(default = "default_settle_max_ms")]
    pub settle_max_ms: u64,

    /// Additional Chrome arguments.
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

fn default_headless() -> bool {
    true
}

fn default_navigation_timeout() -> u64 {
    30
}

fn default_selector_timeout() -> u64 {
    10
}

fn default_settle_min_ms() -> u64 {
    2000
}

fn default_settle_max_ms() -> u64 {
    4000
}

impl Default for BrowserEngineConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            navigation_timeout_secs: default_navigation_timeout(),
            selector_timeout_secs: default_selector_timeout(),
            settle_min_ms: default_settle_min_ms(),
            settle_max_ms: default_settle_max_ms(),
            chrome_args: Vec::new(),
        }
    }
}

impl BrowserEngineConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }
}
