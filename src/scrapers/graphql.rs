//! Structured-query strategy: the site's GraphQL API, keyed by slug.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::{FetchStrategy, FetchTarget, HttpClient, StrategyResult};
use crate::error::FetchError;
use crate::models::{Difficulty, ProblemDetails};

const QUESTION_QUERY: &str = r#"
query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    content
    difficulty
    topicTags {
      name
      slug
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    data: Option<QueryData>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    question: Option<Question>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Question {
    question_frontend_id: Option<String>,
    title: Option<String>,
    content: Option<String>,
    difficulty: Option<String>,
    #[serde(default)]
    topic_tags: Vec<TopicTag>,
}

#[derive(Debug, Deserialize)]
struct TopicTag {
    name: String,
}

/// Fetches problem details from the GraphQL endpoint.
pub struct GraphQlStrategy {
    client: HttpClient,
    endpoint: String,
    site_url: String,
}

impl GraphQlStrategy {
    pub fn new(client: HttpClient, endpoint: &str, site_url: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    async fn query(&self, slug: &str) -> StrategyResult {
        let body = json!({
            "query": QUESTION_QUERY,
            "variables": { "titleSlug": slug },
        });
        let referer = format!("{}/problems/{}/", self.site_url, slug);

        let response: QueryResponse = self
            .client
            .post_json(&self.endpoint, &body, &referer)
            .await?;

        let Some(question) = response.data.and_then(|d| d.question) else {
            debug!(slug, "GraphQL returned no question");
            return Ok(None);
        };

        let title = question
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(FetchError::MissingField("question.title"))?;

        Ok(Some(ProblemDetails {
            title,
            numeric_id: question.question_frontend_id,
            difficulty: question
                .difficulty
                .as_deref()
                .and_then(Difficulty::from_str)
                .unwrap_or_default(),
            description_html: question.content.unwrap_or_default(),
            tags: question.topic_tags.into_iter().map(|t| t.name).collect(),
        }))
    }
}

#[async_trait]
impl FetchStrategy for GraphQlStrategy {
    fn name(&self) -> &'static str {
        "graphql"
    }

    fn requires_slug(&self) -> bool {
        true
    }

    async fn try_fetch(&self, target: &FetchTarget) -> StrategyResult {
        let Some(slug) = target.slug() else {
            return Ok(None);
        };
        match self.query(slug).await {
            Ok(Some(details)) => {
                info!(slug, title = %details.title, "Fetched problem via GraphQL");
                Ok(Some(details))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(slug, error = %e, "GraphQL fetch failed");
                Ok(None)
            }
        }
    }
}
