//! Document strategy: plain GET of the problem page plus markup extraction.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info, warn};

use super::extract::parse_problem_html;
use super::{FetchStrategy, FetchTarget, HttpClient, StrategyResult};

/// Fetches the raw page and extracts fields with fallback selectors.
pub struct DocumentStrategy {
    client: HttpClient,
    referer: String,
    jitter_min: Duration,
    jitter_max: Duration,
}

impl DocumentStrategy {
    pub fn new(client: HttpClient, site_url: &str) -> Self {
        Self {
            client,
            referer: format!("{}/", site_url.trim_end_matches('/')),
            jitter_min: Duration::from_millis(1000),
            jitter_max: Duration::from_millis(3000),
        }
    }

    /// Set the bounds of the random pause taken before each request.
    pub fn with_jitter(mut self, min: Duration, max: Duration) -> Self {
        self.jitter_min = min;
        self.jitter_max = max.max(min);
        self
    }

    fn jitter(&self) -> Duration {
        if self.jitter_max <= self.jitter_min {
            return self.jitter_min;
        }
        let min = self.jitter_min.as_millis() as u64;
        let max = self.jitter_max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min..=max))
    }
}

#[async_trait]
impl FetchStrategy for DocumentStrategy {
    fn name(&self) -> &'static str {
        "document"
    }

    async fn try_fetch(&self, target: &FetchTarget) -> StrategyResult {
        let delay = self.jitter();
        if !delay.is_zero() {
            debug!(url = %target.url, ?delay, "Jitter before document fetch");
            tokio::time::sleep(delay).await;
        }

        let html = match self.client.get_html(&target.url, &self.referer).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %target.url, error = %e, "Document fetch failed");
                return Ok(None);
            }
        };

        match parse_problem_html(&html) {
            Some(details) => {
                info!(url = %target.url, title = %details.title, "Fetched problem from page markup");
                Ok(Some(details))
            }
            None => {
                debug!(url = %target.url, "No title found in page markup");
                Ok(None)
            }
        }
    }
}
