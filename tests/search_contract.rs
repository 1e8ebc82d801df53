//! Wire-contract tests for the web search adapter.

use lark::api::{HttpSearchClient, SearchBackend};
use lark::{ChatError, ClientConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.endpoints.search_url = format!("{}/search", server.uri());
    config
}

#[tokio::test]
async fn search_parses_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"query": "rust async"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"text": "Async programming in Rust", "url": "https://a.example"},
                {"text": "Tokio tutorial", "url": "https://b.example"}
            ],
            "total_results": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpSearchClient::new(&config_for(&server)).unwrap();
    let outcome = client.search("rust async").await.unwrap();

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].text, "Async programming in Rust");
    assert_eq!(outcome.results[1].url, "https://b.example");
    assert_eq!(outcome.total_results, 2);
}

#[tokio::test]
async fn absent_results_field_means_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_results": 0})))
        .mount(&server)
        .await;

    let client = HttpSearchClient::new(&config_for(&server)).unwrap();
    let outcome = client.search("nothing").await.unwrap();
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn rejection_surfaces_the_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"detail": "rate limited"})),
        )
        .mount(&server)
        .await;

    let client = HttpSearchClient::new(&config_for(&server)).unwrap();
    let err = client.search("anything").await.unwrap_err();

    match err {
        ChatError::Remote(message) => assert_eq!(message, "rate limited"),
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let mut config = ClientConfig::default();
    // Nothing listens on the discard port.
    config.endpoints.search_url = "http://127.0.0.1:9/search".to_owned();

    let client = HttpSearchClient::new(&config).unwrap();
    let err = client.search("anything").await.unwrap_err();
    assert!(matches!(err, ChatError::Network(_)));
}
