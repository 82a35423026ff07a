//! Problem URL parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Path marker preceding the problem slug.
const PROBLEMS_MARKER: &str = "/problems/";

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{}([^/?#]+)", regex::escape(PROBLEMS_MARKER)))
        .expect("valid slug regex")
});

/// Canonical identity of a problem page, derived from its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemIdentity {
    pub slug: Option<String>,
    pub numeric_id: Option<String>,
}

/// Parse a problem-page URL.
///
/// Never fails: a URL without the `/problems/<slug>` shape yields a `None`
/// slug, which callers treat as "cannot proceed".
pub fn parse(url: &str) -> ProblemIdentity {
    let slug = SLUG_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty());

    let numeric_id = slug
        .as_ref()
        .filter(|s| s.chars().all(|c| c.is_ascii_digit()))
        .cloned();

    ProblemIdentity { slug, numeric_id }
}

/// Key under which a URL is cached and queued.
pub fn cache_key(url: &str) -> String {
    let trimmed = url.trim();
    match trimmed.split_once('#') {
        Some((before, _)) => before.to_string(),
        None => trimmed.to_string(),
    }
}
