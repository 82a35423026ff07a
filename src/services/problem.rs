//! Problem management on top of the acquisition engine.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use super::store::ProblemStore;
use crate::error::ServiceError;
use crate::fetcher::ProblemFetcher;
use crate::locator;
use crate::models::{Difficulty, Problem};

/// Stored records older than this are refreshed on access.
pub const STALE_AFTER_DAYS: i64 = 30;

/// Creates, refreshes and queries problem records.
pub struct ProblemService {
    fetcher: Arc<ProblemFetcher>,
    store: Arc<dyn ProblemStore>,
}

impl ProblemService {
    pub fn new(fetcher: Arc<ProblemFetcher>, store: Arc<dyn ProblemStore>) -> Self {
        Self { fetcher, store }
    }

    /// Return the stored record for `url`, fetching it on first use.
    ///
    /// A sentinel result on creation is a retryable `FetchFailed`. A stale
    /// record whose refresh yields the sentinel is returned unchanged.
    pub async fn get_or_create_problem(&self, url: &str) -> Result<Problem, ServiceError> {
        let url = locator::cache_key(url);

        if let Some(mut problem) = self.store.find_by_url(&url).await? {
            let cutoff = Utc::now() - Duration::days(STALE_AFTER_DAYS);
            if problem.last_updated < cutoff {
                info!(url = %url, title = %problem.title, "Refreshing stale problem");
                let fresh = self.fetcher.get_problem_details(&url).await;
                if fresh.is_sentinel() {
                    warn!(url = %url, "Refresh failed, keeping stored problem");
                } else {
                    problem.refresh(fresh);
                    self.store.save(&problem).await?;
                }
            }
            return Ok(problem);
        }

        let slug = locator::parse(&url)
            .slug
            .ok_or_else(|| ServiceError::InvalidUrl(url.clone()))?;

        let details = self.fetcher.get_problem_details(&url).await;
        if details.is_sentinel() {
            return Err(ServiceError::FetchFailed(url));
        }

        let problem = Problem::from_details(&url, &slug, details);
        self.store.save(&problem).await?;
        info!(url = %url, title = %problem.title, "Created problem");
        Ok(problem)
    }

    pub async fn get_problem_by_id(&self, id: &str) -> Result<Option<Problem>, ServiceError> {
        self.store.find_by_id(id).await
    }

    pub async fn problems_by_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> Result<Vec<Problem>, ServiceError> {
        let mut problems = self.store.list().await?;
        problems.retain(|p| p.difficulty == difficulty);
        Ok(problems)
    }

    pub async fn problems_by_tag(&self, tag: &str) -> Result<Vec<Problem>, ServiceError> {
        let mut problems = self.store.list().await?;
        problems.retain(|p| p.tags.iter().any(|t| t == tag));
        Ok(problems)
    }

    /// Case-insensitive match against title, description or any tag.
    pub async fn search_problems(&self, keyword: &str) -> Result<Vec<Problem>, ServiceError> {
        let needle = keyword.to_lowercase();
        let mut problems = self.store.list().await?;
        problems.retain(|p| {
            p.title.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        });
        Ok(problems)
    }
}
