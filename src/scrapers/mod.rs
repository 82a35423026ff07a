//! Acquisition strategies and the chain that orders them.
//!
//! Each strategy turns a problem URL into `ProblemDetails` its own way:
//! - `GraphQlStrategy` queries the structured data API by slug.
//! - `DocumentStrategy` fetches the page markup and extracts fields.
//! - `BrowserStrategy` renders the page in headless Chrome.
//!
//! `StrategyChain` tries them in order and never fails.

pub mod browser;
mod chain;
mod document;
pub mod extract;
mod graphql;
mod http_client;

pub use browser::{BrowserEngineConfig, BrowserStrategy};
pub use chain::StrategyChain;
pub use document::DocumentStrategy;
pub use graphql::GraphQlStrategy;
pub use http_client::{random_user_agent, HttpClient, DEFAULT_USER_AGENTS};

use async_trait::async_trait;
use tracing::warn;

use crate::error::FetchError;
use crate::locator::ProblemIdentity;
use crate::models::ProblemDetails;

/// Outcome of one strategy attempt.
///
/// `Ok(None)` and `Err(_)` both mean "try the next strategy".
pub type StrategyResult = Result<Option<ProblemDetails>, FetchError>;

/// The problem page a strategy should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub url: String,
    pub identity: ProblemIdentity,
}

impl FetchTarget {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            identity: crate::locator::parse(url),
        }
    }

    pub fn slug(&self) -> Option<&str> {
        self.identity.slug.as_deref()
    }
}

/// Result of running the whole chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// A strategy produced structured details.
    Fetched {
        strategy: &'static str,
        details: ProblemDetails,
    },
    /// Every strategy failed.
    Exhausted,
}

impl Acquisition {
    /// Details for the caller; the sentinel value when exhausted.
    pub fn into_details(self) -> ProblemDetails {
        match self {
            Acquisition::Fetched { details, .. } => details,
            Acquisition::Exhausted => ProblemDetails::sentinel(),
        }
    }

    pub fn strategy(&self) -> Option<&'static str> {
        match self {
            Acquisition::Fetched { strategy, .. } => Some(strategy),
            Acquisition::Exhausted => None,
        }
    }
}

/// One way of acquiring problem details.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Strategies keyed by slug are skipped for URLs without one.
    fn requires_slug(&self) -> bool {
        false
    }

    /// Attempt to fetch the target.
    async fn try_fetch(&self, target: &FetchTarget) -> StrategyResult;

    /// Attempt to fetch, folding every failure into `Acquisition::Exhausted`.
    ///
    /// Used for the last link of the chain, which must never fail.
    async fn fetch_or_sentinel(&self, target: &FetchTarget) -> Acquisition {
        match self.try_fetch(target).await {
            Ok(Some(details)) => Acquisition::Fetched {
                strategy: self.name(),
                details,
            },
            Ok(None) => {
                warn!(url = %target.url, strategy = self.name(), "Last-resort strategy found nothing");
                Acquisition::Exhausted
            }
            Err(e) => {
                warn!(url = %target.url, strategy = self.name(), error = %e, "Last-resort strategy failed");
                Acquisition::Exhausted
            }
        }
    }
}
