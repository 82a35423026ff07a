//! Serialized, rate-limited fetch queue.
//!
//! A single worker task drains URLs in FIFO order: run the strategy chain,
//! write the cache, resolve every waiter for that URL, then sleep for the
//! minimum request interval before taking the next item. All outbound
//! fetches in the process go through this one worker.
//!
//! Requests for a URL that is already queued or in flight attach to the
//! pending item instead of enqueuing a second fetch.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::cache::ProblemCache;
use crate::models::ProblemDetails;
use crate::scrapers::StrategyChain;

type Waiters = Vec<oneshot::Sender<ProblemDetails>>;

/// How a request will be answered.
#[derive(Debug)]
pub enum Ticket {
    /// Served from cache without touching the queue.
    Ready(ProblemDetails),
    /// Resolved by the worker once the fetch completes.
    Waiting(oneshot::Receiver<ProblemDetails>),
}

/// State shared between callers and the worker.
///
/// The pending lock is always taken before the cache lock. Callers check the
/// cache and register as waiters under it, and the worker writes the cache
/// and takes the waiters under it, so a caller sees either the cached value
/// or a pending entry that will be resolved.
struct Shared {
    cache: Arc<ProblemCache>,
    pending: Mutex<HashMap<String, Waiters>>,
}

impl Shared {
    fn publish(&self, url: &str, details: &ProblemDetails) -> Waiters {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        self.cache.put(url, details.clone());
        pending.remove(url).unwrap_or_default()
    }
}

/// Handle to the fetch queue and its worker.
pub struct RequestQueue {
    sender: mpsc::UnboundedSender<String>,
    shared: Arc<Shared>,
}

impl RequestQueue {
    /// Spawn the worker. Must be called from within a tokio runtime.
    pub fn start(chain: StrategyChain, cache: Arc<ProblemCache>, min_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            cache,
            pending: Mutex::new(HashMap::new()),
        });

        tokio::spawn(run_worker(receiver, chain, shared.clone(), min_interval));

        Self { sender, shared }
    }

    /// Answer from cache, or join (or create) the pending fetch for `url`.
    pub fn enqueue(&self, url: &str) -> Ticket {
        let mut pending = self.shared.pending.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(details) = self.shared.cache.get(url) {
            debug!(url, "Cache hit");
            return Ticket::Ready(details);
        }

        let (tx, rx) = oneshot::channel();
        if let Some(waiters) = pending.get_mut(url) {
            debug!(url, waiters = waiters.len(), "Joining in-flight fetch");
            waiters.push(tx);
            return Ticket::Waiting(rx);
        }

        if self.sender.send(url.to_string()).is_err() {
            warn!(url, "Fetch worker is gone, returning sentinel");
            return Ticket::Ready(ProblemDetails::sentinel());
        }
        pending.insert(url.to_string(), vec![tx]);
        debug!(url, queued = pending.len(), "Enqueued fetch");
        Ticket::Waiting(rx)
    }

    /// Number of distinct URLs queued or in flight.
    pub fn pending_len(&self) -> usize {
        self.shared.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<String>,
    chain: StrategyChain,
    shared: Arc<Shared>,
    min_interval: Duration,
) {
    while let Some(url) = receiver.recv().await {
        let details = match AssertUnwindSafe(chain.fetch(&url)).catch_unwind().await {
            Ok(acquisition) => {
                match acquisition.strategy() {
                    Some(strategy) => info!(url = %url, strategy, "Problem fetched"),
                    None => warn!(url = %url, "All strategies exhausted"),
                }
                acquisition.into_details()
            }
            Err(_) => {
                error!(url = %url, "Strategy panicked, returning sentinel");
                ProblemDetails::sentinel()
            }
        };

        let waiters = shared.publish(&url, &details);
        for waiter in waiters {
            // A dropped receiver only means that caller stopped waiting.
            let _ = waiter.send(details.clone());
        }

        if !min_interval.is_zero() {
            debug!(?min_interval, "Rate limiting before next fetch");
            tokio::time::sleep(min_interval).await;
        }
    }
    debug!("Fetch queue closed, worker exiting");
}
