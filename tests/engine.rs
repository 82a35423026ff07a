//! End-to-end tests of the engine against a mock problem site.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use problem_acquire::scrapers::{
    BrowserEngineConfig, BrowserStrategy, DocumentStrategy, GraphQlStrategy, HttpClient,
    StrategyChain,
};
use problem_acquire::{
    Difficulty, InMemoryProblemStore, ProblemDetails, ProblemFetcher, ProblemService,
    ServiceError,
};

const PROBLEM_PAGE: &str = r#"<html><head><title>Two Sum - LeetCode</title></head><body>
    <div data-cy="question-title">1. Two Sum</div>
    <div class="text-difficulty-easy">Easy</div>
    <div data-track-load="description_content"><p>Given an array of integers</p></div>
    <div class="flex gap-2">
      <a class="bg-fill-secondary">Array</a>
      <a class="bg-fill-secondary">Hash Table</a>
    </div>
    </body></html>"#;

/// Chain pointed at the mock server, with a browser that cannot launch.
fn chain(server: &MockServer) -> StrategyChain {
    let site = server.uri();
    let client = HttpClient::new(vec!["test-agent".to_string()], Duration::from_secs(5)).unwrap();
    let graphql = GraphQlStrategy::new(client.clone(), &format!("{}/graphql", site), &site);
    let document =
        DocumentStrategy::new(client, &site).with_jitter(Duration::ZERO, Duration::ZERO);
    let browser = BrowserStrategy::new(
        BrowserEngineConfig {
            chrome_path: Some(PathBuf::from("/nonexistent/chrome")),
            ..Default::default()
        },
        vec![],
    );
    StrategyChain::new(
        vec![Arc::new(graphql), Arc::new(document)],
        Arc::new(browser),
    )
}

fn fetcher(server: &MockServer) -> ProblemFetcher {
    ProblemFetcher::with_chain(
        chain(server),
        Duration::from_secs(60),
        Duration::from_millis(20),
    )
}

async fn mount_question(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"question": {
                "questionFrontendId": "1",
                "title": "1. Two Sum",
                "content": "<p>Given an array of integers</p>",
                "difficulty": "Easy",
                "topicTags": [{"name": "Array"}, {"name": "Hash Table"}]
            }}
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn structured_query_result_is_cached_and_reused() {
    let server = MockServer::start().await;
    mount_question(&server, 1).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROBLEM_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let f = fetcher(&server);
    let url = format!("{}/problems/two-sum/description/", server.uri());

    let first = f.get_problem_details(&url).await;
    let second = f.get_problem_details(&url).await;

    assert_eq!(first.title, "1. Two Sum");
    assert_eq!(first.difficulty, Difficulty::Easy);
    assert_eq!(first.tags, vec!["Array", "Hash Table"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn page_markup_is_used_when_query_finds_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"question": null}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/problems/two-sum/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROBLEM_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let details = fetcher(&server)
        .get_problem_details(&format!("{}/problems/two-sum/", server.uri()))
        .await;

    assert_eq!(details.title, "1. Two Sum");
    assert_eq!(details.numeric_id.as_deref(), Some("1"));
    assert_eq!(details.difficulty, Difficulty::Easy);
    assert_eq!(details.description_html, "<p>Given an array of integers</p>");
    assert_eq!(details.tags, vec!["Array", "Hash Table"]);
}

#[tokio::test]
async fn total_failure_resolves_to_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Access Denied"))
        .mount(&server)
        .await;

    let details = fetcher(&server)
        .get_problem_details(&format!("{}/problems/two-sum/", server.uri()))
        .await;

    assert_eq!(details, ProblemDetails::sentinel());
    assert_eq!(details.title, "Unknown Problem");
    assert_eq!(details.difficulty, Difficulty::Unknown);
    assert!(details.description_html.is_empty());
    assert!(details.tags.is_empty());
}

#[tokio::test]
async fn url_without_slug_goes_straight_to_markup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/explore/card/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROBLEM_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let details = fetcher(&server)
        .get_problem_details(&format!("{}/explore/card/", server.uri()))
        .await;
    assert_eq!(details.title, "1. Two Sum");
}

#[tokio::test]
async fn concurrent_callers_trigger_one_fetch() {
    let server = MockServer::start().await;
    mount_question(&server, 1).await;

    let f = fetcher(&server);
    let url = format!("{}/problems/two-sum/", server.uri());
    let results = futures::future::join_all((0..5).map(|_| f.get_problem_details(&url))).await;

    assert!(results.iter().all(|d| d.title == "1. Two Sum"));
}

#[tokio::test]
async fn service_creates_and_looks_up_problems() {
    let server = MockServer::start().await;
    mount_question(&server, 1).await;

    let service = ProblemService::new(
        Arc::new(fetcher(&server)),
        Arc::new(InMemoryProblemStore::new()),
    );
    let url = format!("{}/problems/two-sum/", server.uri());

    let created = service.get_or_create_problem(&url).await.unwrap();
    assert_eq!(created.problem_id, "1");

    let found = service.get_problem_by_id("1").await.unwrap().unwrap();
    assert_eq!(found.url, url);
    assert_eq!(service.search_problems("two").await.unwrap().len(), 1);

    let err = service
        .get_or_create_problem(&format!("{}/contest/", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidUrl(_)));
}
