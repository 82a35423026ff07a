//! Ordered strategy fallback.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    Acquisition, BrowserStrategy, DocumentStrategy, FetchStrategy, FetchTarget, GraphQlStrategy,
    HttpClient,
};
use crate::config::EngineConfig;
use crate::error::FetchError;

/// Runs strategies in order until one yields details.
///
/// The primary strategies may fail freely; the last resort is consulted
/// through [`FetchStrategy::fetch_or_sentinel`], so a chain run always
/// produces an [`Acquisition`].
pub struct StrategyChain {
    strategies: Vec<Arc<dyn FetchStrategy>>,
    last_resort: Arc<dyn FetchStrategy>,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Arc<dyn FetchStrategy>>, last_resort: Arc<dyn FetchStrategy>) -> Self {
        Self {
            strategies,
            last_resort,
        }
    }

    /// The standard chain: GraphQL, then page markup, then the browser.
    pub fn from_config(config: &EngineConfig) -> Result<Self, FetchError> {
        let client = HttpClient::new(config.user_agents.clone(), config.request_timeout())?;
        let site_url = config.site_url.trim_end_matches('/');

        let graphql = GraphQlStrategy::new(client.clone(), &config.graphql_endpoint(), site_url);
        let document = DocumentStrategy::new(client, site_url).with_jitter(
            std::time::Duration::from_millis(config.jitter_min_ms),
            std::time::Duration::from_millis(config.jitter_max_ms),
        );
        let browser = BrowserStrategy::new(config.browser.clone(), config.user_agents.clone());

        Ok(Self::new(
            vec![Arc::new(graphql), Arc::new(document)],
            Arc::new(browser),
        ))
    }

    /// Names of the strategies in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies
            .iter()
            .map(|s| s.name())
            .chain(std::iter::once(self.last_resort.name()))
            .collect()
    }

    /// Acquire details for a URL.
    pub async fn fetch(&self, url: &str) -> Acquisition {
        let target = FetchTarget::new(url);

        for strategy in &self.strategies {
            if strategy.requires_slug() && target.slug().is_none() {
                debug!(url, strategy = strategy.name(), "No slug in URL, skipping");
                continue;
            }

            match strategy.try_fetch(&target).await {
                Ok(Some(details)) => {
                    return Acquisition::Fetched {
                        strategy: strategy.name(),
                        details,
                    };
                }
                Ok(None) => {
                    debug!(url, strategy = strategy.name(), "Strategy found nothing, falling back");
                }
                Err(e) => {
                    warn!(url, strategy = strategy.name(), error = %e, "Strategy failed, falling back");
                }
            }
        }

        info!(url, strategy = self.last_resort.name(), "Falling back to last resort");
        self.last_resort.fetch_or_sentinel(&target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ProblemDetails};
    use crate::scrapers::StrategyResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Found(&'static str),
        Nothing,
        Fail,
    }

    struct Scripted {
        name: &'static str,
        behavior: Behavior,
        needs_slug: bool,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                needs_slug: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn keyed(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                needs_slug: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FetchStrategy for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn requires_slug(&self) -> bool {
            self.needs_slug
        }

        async fn try_fetch(&self, _target: &FetchTarget) -> StrategyResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Found(title) => Ok(Some(ProblemDetails {
                    title: title.to_string(),
                    numeric_id: None,
                    difficulty: Difficulty::Medium,
                    description_html: "<p>d</p>".to_string(),
                    tags: vec![],
                })),
                Behavior::Nothing => Ok(None),
                Behavior::Fail => Err(FetchError::Browser("scripted failure".to_string())),
            }
        }
    }

    const URL: &str = "https://leetcode.com/problems/two-sum/";

    #[tokio::test]
    async fn test_first_success_wins() {
        let a = Scripted::keyed("a", Behavior::Found("From A"));
        let b = Scripted::new("b", Behavior::Found("From B"));
        let c = Scripted::new("c", Behavior::Found("From C"));
        let chain = StrategyChain::new(vec![a.clone(), b.clone()], c.clone());

        let outcome = chain.fetch(URL).await;
        assert_eq!(outcome.strategy(), Some("a"));
        assert_eq!(outcome.into_details().title, "From A");
        assert_eq!((a.calls(), b.calls(), c.calls()), (1, 0, 0));
    }

    #[tokio::test]
    async fn test_falls_through_to_second_strategy() {
        let a = Scripted::keyed("a", Behavior::Nothing);
        let b = Scripted::new("b", Behavior::Found("From B"));
        let c = Scripted::new("c", Behavior::Found("From C"));
        let chain = StrategyChain::new(vec![a.clone(), b.clone()], c.clone());

        let outcome = chain.fetch(URL).await;
        assert_eq!(outcome.strategy(), Some("b"));
        assert_eq!(outcome.into_details().title, "From B");
        assert_eq!(c.calls(), 0);
    }

    #[tokio::test]
    async fn test_errors_fall_through_to_last_resort() {
        let a = Scripted::keyed("a", Behavior::Fail);
        let b = Scripted::new("b", Behavior::Fail);
        let c = Scripted::new("c", Behavior::Found("From C"));
        let chain = StrategyChain::new(vec![a.clone(), b.clone()], c.clone());

        let outcome = chain.fetch(URL).await;
        assert_eq!(outcome.strategy(), Some("c"));
        assert_eq!((a.calls(), b.calls(), c.calls()), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_everything_failing_is_sentinel() {
        let chain = StrategyChain::new(
            vec![
                Scripted::keyed("a", Behavior::Nothing),
                Scripted::new("b", Behavior::Fail),
            ],
            Scripted::new("c", Behavior::Fail),
        );

        let outcome = chain.fetch(URL).await;
        assert_eq!(outcome, Acquisition::Exhausted);
        assert!(outcome.into_details().is_sentinel());
    }

    #[tokio::test]
    async fn test_url_without_slug_skips_keyed_strategy() {
        let a = Scripted::keyed("a", Behavior::Found("From A"));
        let b = Scripted::new("b", Behavior::Found("From B"));
        let chain = StrategyChain::new(vec![a.clone(), b.clone()], Scripted::new("c", Behavior::Fail));

        let outcome = chain.fetch("https://leetcode.com/contest/weekly-1/").await;
        assert_eq!(outcome.strategy(), Some("b"));
        assert_eq!(a.calls(), 0);
    }

    #[test]
    fn test_default_chain_order() {
        let chain = StrategyChain::from_config(&EngineConfig::default()).unwrap();
        assert_eq!(chain.strategy_names(), vec!["graphql", "document", "browser"]);
    }
}
