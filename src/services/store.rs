//! Problem record storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::ServiceError;
use crate::models::Problem;

/// Persistence for problem records, keyed by canonical URL.
#[async_trait]
pub trait ProblemStore: Send + Sync {
    async fn find_by_url(&self, url: &str) -> Result<Option<Problem>, ServiceError>;

    /// Look up by URL or by `problem_id`.
    async fn find_by_id(&self, id: &str) -> Result<Option<Problem>, ServiceError>;

    /// Insert or replace the record with the same URL.
    async fn save(&self, problem: &Problem) -> Result<(), ServiceError>;

    async fn list(&self) -> Result<Vec<Problem>, ServiceError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct InMemoryProblemStore {
    problems: RwLock<HashMap<String, Problem>>,
}

impl InMemoryProblemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProblemStore for InMemoryProblemStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<Problem>, ServiceError> {
        Ok(self.problems.read().await.get(url).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Problem>, ServiceError> {
        let problems = self.problems.read().await;
        if let Some(problem) = problems.get(id) {
            return Ok(Some(problem.clone()));
        }
        Ok(problems.values().find(|p| p.problem_id == id).cloned())
    }

    async fn save(&self, problem: &Problem) -> Result<(), ServiceError> {
        self.problems
            .write()
            .await
            .insert(problem.url.clone(), problem.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Problem>, ServiceError> {
        let mut problems: Vec<Problem> = self.problems.read().await.values().cloned().collect();
        problems.sort_by(|a, b| a.url.cmp(&b.url));
        Ok(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ProblemDetails};

    fn problem(url: &str, id: &str) -> Problem {
        Problem::from_details(
            url,
            id,
            ProblemDetails {
                title: "T".to_string(),
                numeric_id: None,
                difficulty: Difficulty::Easy,
                description_html: String::new(),
                tags: vec![],
            },
        )
    }

    #[tokio::test]
    async fn test_save_replaces_by_url() {
        let store = InMemoryProblemStore::new();
        let mut p = problem("https://leetcode.com/problems/a/", "a");
        store.save(&p).await.unwrap();
        p.title = "Changed".to_string();
        store.save(&p).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        let found = store.find_by_url(&p.url).await.unwrap().unwrap();
        assert_eq!(found.title, "Changed");
    }

    #[tokio::test]
    async fn test_find_by_id_matches_url_or_problem_id() {
        let store = InMemoryProblemStore::new();
        store
            .save(&problem("https://leetcode.com/problems/a/", "a"))
            .await
            .unwrap();

        assert!(store.find_by_id("a").await.unwrap().is_some());
        assert!(store
            .find_by_id("https://leetcode.com/problems/a/")
            .await
            .unwrap()
            .is_some());
        assert!(store.find_by_id("b").await.unwrap().is_none());
    }
}
