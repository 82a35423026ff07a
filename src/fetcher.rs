//! Public entry point of the acquisition engine.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::cache::ProblemCache;
use crate::config::EngineConfig;
use crate::error::FetchError;
use crate::locator;
use crate::models::ProblemDetails;
use crate::queue::{RequestQueue, Ticket};
use crate::scrapers::StrategyChain;

/// Cached, rate-limited problem detail fetcher.
///
/// Owns the cache and the single fetch worker. Construct one per process
/// and share it; every clone of the surrounding `Arc` sees the same cache
/// and queue.
///
/// The cache is only written by the worker; callers can observe its size
/// but never reach it directly:
///
/// ```compile_fail
/// fn poison(f: &problem_acquire::ProblemFetcher) {
///     let _ = f.cache();
/// }
/// ```
///
/// ```compile_fail
/// use problem_acquire::cache::ProblemCache;
/// ```
///
/// ```compile_fail
/// use problem_acquire::queue::RequestQueue;
/// ```
pub struct ProblemFetcher {
    cache: Arc<ProblemCache>,
    queue: RequestQueue,
}

impl ProblemFetcher {
    /// Build the standard strategy chain from configuration.
    ///
    /// Spawns the worker task, so this must run inside a tokio runtime.
    pub fn new(config: &EngineConfig) -> Result<Self, FetchError> {
        let chain = StrategyChain::from_config(config)?;
        Ok(Self::with_chain(
            chain,
            config.cache_ttl(),
            config.min_request_interval(),
        ))
    }

    pub fn with_chain(chain: StrategyChain, cache_ttl: Duration, min_interval: Duration) -> Self {
        let cache = Arc::new(ProblemCache::new(cache_ttl));
        let queue = RequestQueue::start(chain, cache.clone(), min_interval);
        Self { cache, queue }
    }

    /// Fetch details for a problem URL.
    ///
    /// Never fails: when every strategy is exhausted the sentinel value
    /// (see [`ProblemDetails::sentinel`]) is returned.
    pub async fn get_problem_details(&self, url: &str) -> ProblemDetails {
        let key = locator::cache_key(url);
        match self.queue.enqueue(&key) {
            Ticket::Ready(details) => details,
            Ticket::Waiting(rx) => rx.await.unwrap_or_else(|_| {
                warn!(url = %key, "Fetch worker dropped request, returning sentinel");
                ProblemDetails::sentinel()
            }),
        }
    }

    /// Number of URLs with a cached result, expired entries included.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Distinct URLs currently queued or being fetched.
    pub fn pending(&self) -> usize {
        self.queue.pending_len()
    }
}
