//! Identity header pool for outbound requests.

use rand::Rng;

/// Desktop browser user agents rotated across requests.
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    // Safari on Mac
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    // Chrome on Linux
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:90.0) Gecko/20100101 Firefox/90.0",
    // Firefox on Mac
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:90.0) Gecko/20100101 Firefox/90.0",
];

/// Pick a random entry from a user agent pool.
///
/// Falls back to the first built-in agent when the pool is empty.
pub fn random_user_agent(pool: &[String]) -> &str {
    if pool.is_empty() {
        return DEFAULT_USER_AGENTS[0];
    }
    let idx = rand::rng().random_range(0..pool.len());
    &pool[idx]
}
