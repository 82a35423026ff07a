//! Last-resort strategy: render the problem page in headless Chrome.
//!
//! Uses chromiumoxide (CDP) with automation-hiding flags and scripts, then
//! runs the shared extraction script against the live DOM. A fresh browser
//! is launched per attempt and always torn down afterwards.

mod config;
#[cfg(feature = "browser")]
mod stealth;

pub use config::BrowserEngineConfig;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use super::{FetchStrategy, FetchTarget, StrategyResult};
use crate::error::FetchError;

#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::network::{
    Headers, SetExtraHttpHeadersParams, SetUserAgentOverrideParams,
};
#[cfg(feature = "browser")]
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, NavigateParams,
};
#[cfg(feature = "browser")]
use chromiumoxide::{Browser, BrowserConfig, Page};
#[cfg(feature = "browser")]
use futures::StreamExt;
#[cfg(feature = "browser")]
use tokio::task::JoinHandle;
#[cfg(feature = "browser")]
use tracing::{info, warn};

#[cfg(feature = "browser")]
use super::extract::{self, RawFields, TITLE_SELECTORS};
#[cfg(feature = "browser")]
use super::random_user_agent;
#[cfg(feature = "browser")]
use stealth::{STEALTH_ARGS, STEALTH_SCRIPTS};

#[cfg(feature = "browser")]
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Common Chrome executable paths to check.
const CHROME_PATHS: &[&str] = &[
    // Linux
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    // macOS
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    // Common install locations
    "/opt/google/chrome/google-chrome",
];

const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Headless browser strategy.
pub struct BrowserStrategy {
    config: BrowserEngineConfig,
    #[cfg_attr(not(feature = "browser"), allow(dead_code))]
    user_agents: Vec<String>,
}

#[cfg_attr(not(feature = "browser"), allow(dead_code))]
impl BrowserStrategy {
    pub fn new(config: BrowserEngineConfig, user_agents: Vec<String>) -> Self {
        Self {
            config,
            user_agents,
        }
    }

    /// Resolve the Chrome executable.
    ///
    /// An explicitly configured path must exist; otherwise well-known install
    /// locations are checked before searching `PATH`.
    fn find_chrome(&self) -> Result<PathBuf, FetchError> {
        if let Some(path) = &self.config.chrome_path {
            if path.exists() {
                return Ok(path.clone());
            }
            return Err(FetchError::BrowserUnavailable(format!(
                "configured Chrome path does not exist: {}",
                path.display()
            )));
        }

        for path in CHROME_PATHS {
            let p = std::path::Path::new(path);
            if p.exists() {
                debug!("Found Chrome at: {}", path);
                return Ok(p.to_path_buf());
            }
        }

        for cmd in CHROME_COMMANDS {
            if let Ok(path) = which::which(cmd) {
                debug!("Found Chrome in PATH: {}", path.display());
                return Ok(path);
            }
        }

        Err(FetchError::BrowserUnavailable(
            "Chrome/Chromium not found; install it or set browser.chrome_path".to_string(),
        ))
    }

    /// Random pause before navigating.
    fn settle_delay(&self) -> Duration {
        let min = self.config.settle_min_ms;
        let max = self.config.settle_max_ms;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

#[cfg(feature = "browser")]
impl BrowserStrategy {
    async fn launch(&self) -> Result<(Browser, JoinHandle<()>), FetchError> {
        let chrome_path = self.find_chrome()?;
        info!(
            "Launching browser (headless={}) from {}",
            self.config.headless,
            chrome_path.display()
        );

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(1920, 1080);

        // with_head means NOT headless
        if !self.config.headless {
            builder = builder.with_head();
        }

        for arg in STEALTH_ARGS {
            builder = builder.arg(*arg);
        }
        for arg in &self.config.chrome_args {
            builder = builder.arg(arg.as_str());
        }

        let config = builder
            .build()
            .map_err(|e| FetchError::Browser(format!("invalid browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| FetchError::Browser(format!("failed to launch browser: {}", e)))?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok((browser, handle))
    }

    async fn prepare_page(&self, page: &Page) -> Result<(), FetchError> {
        let user_agent = random_user_agent(&self.user_agents).to_string();
        let ua_params = SetUserAgentOverrideParams::builder()
            .user_agent(user_agent)
            .accept_language(ACCEPT_LANGUAGE)
            .build()
            .map_err(FetchError::Browser)?;
        page.execute(ua_params).await.map_err(cdp_error)?;

        let headers = Headers::new(serde_json::json!({
            "Accept-Language": ACCEPT_LANGUAGE,
            "DNT": "1",
        }));
        page.execute(SetExtraHttpHeadersParams::new(headers))
            .await
            .map_err(cdp_error)?;

        for script in STEALTH_SCRIPTS {
            if let Err(e) = page
                .execute(AddScriptToEvaluateOnNewDocumentParams::new(script.to_string()))
                .await
            {
                debug!("Stealth script registration skipped: {}", e);
            }
        }
        Ok(())
    }

    /// Poll until a title element shows up. Extraction runs either way.
    async fn wait_for_title(&self, page: &Page) {
        let selector = TITLE_SELECTORS.join(", ");
        let deadline = tokio::time::Instant::now() + self.config.selector_timeout();
        loop {
            if page.find_element(selector.as_str()).await.is_ok() {
                debug!("Title element present");
                return;
            }
            if tokio::time::Instant::now() >= deadline {
                warn!("Timeout waiting for title element");
                return;
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }

    async fn scrape(&self, page: &Page, url: &str) -> StrategyResult {
        self.prepare_page(page).await?;

        let delay = self.settle_delay();
        debug!(?delay, "Pausing before navigation");
        tokio::time::sleep(delay).await;

        let nav_params = NavigateParams::builder()
            .url(url)
            .build()
            .map_err(|e| FetchError::Browser(format!("invalid URL {}: {}", url, e)))?;
        let nav_timeout = self.config.navigation_timeout();
        tokio::time::timeout(nav_timeout, page.execute(nav_params))
            .await
            .map_err(|_| FetchError::Timeout(nav_timeout))?
            .map_err(|e| FetchError::Browser(format!("navigation failed for {}: {}", url, e)))?;

        self.wait_for_title(page).await;

        let raw: RawFields = page
            .evaluate(extract::extraction_script())
            .await
            .map_err(cdp_error)?
            .into_value()
            .map_err(|e| FetchError::Browser(format!("unexpected extraction result: {}", e)))?;

        Ok(extract::normalize(raw))
    }
}

#[cfg(feature = "browser")]
fn cdp_error(e: chromiumoxide::error::CdpError) -> FetchError {
    FetchError::Browser(e.to_string())
}

#[async_trait]
impl FetchStrategy for BrowserStrategy {
    fn name(&self) -> &'static str {
        "browser"
    }

    #[cfg(feature = "browser")]
    async fn try_fetch(&self, target: &FetchTarget) -> StrategyResult {
        let (mut browser, handler) = self.launch().await?;

        let result = match browser.new_page("about:blank").await {
            Ok(page) => {
                let result = self.scrape(&page, &target.url).await;
                let _ = page.close().await;
                result
            }
            Err(e) => Err(cdp_error(e)),
        };

        if let Err(e) = browser.close().await {
            debug!("Browser close failed: {}", e);
        }
        let _ = browser.wait().await;
        handler.abort();

        if let Ok(Some(details)) = &result {
            info!(url = %target.url, title = %details.title, "Fetched problem via browser");
        }
        result
    }

    #[cfg(not(feature = "browser"))]
    async fn try_fetch(&self, target: &FetchTarget) -> StrategyResult {
        debug!(url = %target.url, "Browser strategy skipped");
        Err(FetchError::BrowserUnavailable(
            "browser support not compiled; rebuild with --features browser".to_string(),
        ))
    }
}
