//! Web search collaborator adapter.
//!
//! Posts `{query}` and parses `{results, total_results}`. A response
//! with no `results` field is an empty result set, not an error — only
//! transport and status failures surface as errors, and even those are
//! absorbed one layer up by the auto-search coordinator.

use crate::config::ClientConfig;
use crate::error::{ChatError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request body for the search endpoint.
#[derive(Debug, Clone, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

/// One search result from the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// Result text/snippet.
    #[serde(default)]
    pub text: String,
    /// Source URL.
    #[serde(default)]
    pub url: String,
}

/// Parsed search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchOutcome {
    /// Results in collaborator order; absent field means empty.
    #[serde(default)]
    pub results: Vec<SearchHit>,
    /// Total result count reported by the collaborator.
    #[serde(default)]
    pub total_results: u64,
}

/// The web search collaborator boundary.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search for the raw user text.
    async fn search(&self, query: &str) -> Result<SearchOutcome>;
}

/// HTTP client for the web search endpoint.
pub struct HttpSearchClient {
    client: reqwest::Client,
    url: String,
}

impl HttpSearchClient {
    /// Create a client over the configured search endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = super::build_client(config.http.request_timeout_secs)?;
        Ok(Self {
            client,
            url: config.endpoints.search_url.clone(),
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, query: &str) -> Result<SearchOutcome> {
        debug!(query, "sending web search request");
        let response = self
            .client
            .post(&self.url)
            .json(&SearchRequest { query })
            .send()
            .await
            .map_err(|e| ChatError::Network(format!("search request failed: {e}")))?;

        let status = response.status();
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Network(format!("search response was not JSON: {e}")))?;

        if !status.is_success() {
            return Err(ChatError::Remote(super::error_detail(
                &payload,
                "search request failed",
            )));
        }

        let outcome: SearchOutcome = serde_json::from_value(payload)
            .map_err(|e| ChatError::Remote(format!("malformed search response: {e}")))?;
        debug!(
            results = outcome.results.len(),
            total = outcome.total_results,
            "search response received"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_query() {
        let body = serde_json::to_value(SearchRequest { query: "weather" }).unwrap();
        assert_eq!(body, json!({"query": "weather"}));
    }

    #[test]
    fn outcome_parses_results() {
        let outcome: SearchOutcome = serde_json::from_value(json!({
            "results": [
                {"text": "Sunny today", "url": "https://wx.example"},
                {"text": "Rain tomorrow", "url": "https://wx2.example"}
            ],
            "total_results": 2
        }))
        .unwrap();
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].url, "https://wx.example");
        assert_eq!(outcome.total_results, 2);
    }

    #[test]
    fn absent_results_field_is_empty_not_error() {
        let outcome: SearchOutcome = serde_json::from_value(json!({"total_results": 0})).unwrap();
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn hit_tolerates_missing_fields() {
        let hit: SearchHit = serde_json::from_value(json!({"url": "https://a.example"})).unwrap();
        assert_eq!(hit.text, "");
        assert_eq!(hit.url, "https://a.example");
    }
}
