//! In-memory TTL cache of fetched problem details.
//!
//! Keyed by URL. Expired entries are evicted on lookup, so an entry present
//! in the map is always fresh. Not shared across processes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::models::ProblemDetails;

/// A cached result with its capture time.
#[derive(Debug, Clone)]
struct CacheEntry {
    captured_at: Instant,
    details: ProblemDetails,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.captured_at.elapsed() >= ttl
    }
}

/// Cache of problem details by URL.
#[derive(Debug)]
pub struct ProblemCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ProblemCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a URL, evicting the entry if it has expired.
    pub fn get(&self, url: &str) -> Option<ProblemDetails> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(url) {
            Some(entry) if entry.is_expired(self.ttl) => {
                debug!(url, "Cache entry expired, evicting");
                entries.remove(url);
                None
            }
            Some(entry) => Some(entry.details.clone()),
            None => None,
        }
    }

    /// Store or refresh the entry for a URL.
    pub fn put(&self, url: &str, details: ProblemDetails) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            url.to_string(),
            CacheEntry {
                captured_at: Instant::now(),
                details,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
