//! HTTP client with rotated identity headers and a bounded timeout.

mod user_agent;

pub use user_agent::{random_user_agent, DEFAULT_USER_AGENTS};

use std::time::{Duration, Instant};

use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, CONTENT_TYPE, REFERER, USER_AGENT,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::FetchError;

/// HTTP client shared by the structured-query and document strategies.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    user_agents: Vec<String>,
}

impl HttpClient {
    /// Create a client that draws its User-Agent from `user_agents`.
    pub fn new(user_agents: Vec<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            user_agents,
        })
    }

    fn user_agent(&self) -> String {
        random_user_agent(&self.user_agents).to_string()
    }

    /// GET a page as text with browser-like headers.
    ///
    /// Non-success statuses are errors.
    pub async fn get_html(&self, url: &str, referer: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent())
            .header(ACCEPT, "text/html,application/xhtml+xml,application/xml")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(REFERER, referer)
            .header("DNT", "1")
            .header(CONNECTION, "keep-alive")
            .header("Upgrade-Insecure-Requests", "1")
            .header(CACHE_CONTROL, "max-age=0")
            .send()
            .await?;

        let status = response.status();
        debug!(url, status = status.as_u16(), elapsed = ?start.elapsed(), "GET");
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<B, T>(&self, url: &str, body: &B, referer: &str) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .header(USER_AGENT, self.user_agent())
            .header(CONTENT_TYPE, "application/json")
            .header(REFERER, referer)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        debug!(url, status = status.as_u16(), elapsed = ?start.elapsed(), "POST");
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
