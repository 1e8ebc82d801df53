//! HTTP adapters for the collaborator services.
//!
//! The chat completion, web search, and speech transcription services
//! are remote HTTP collaborators. Each adapter converts every transport,
//! status, and decode failure into a [`ChatError`] value at this
//! boundary — the orchestration layer inspects results, no exception
//! ever crosses a component seam.

pub mod chat;
pub mod search;
pub mod transcribe;

pub use chat::{ChatBackend, ChatReply, HttpChatClient};
pub use search::{HttpSearchClient, SearchBackend, SearchHit, SearchOutcome};
pub use transcribe::HttpTranscribeClient;

use crate::error::{ChatError, Result};

/// Build the shared reqwest client, honouring the configured timeout.
///
/// A timeout of 0 leaves calls deadline-free.
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if timeout_secs > 0 {
        builder = builder.timeout(std::time::Duration::from_secs(timeout_secs));
    }
    builder
        .build()
        .map_err(|e| ChatError::Config(format!("cannot build HTTP client: {e}")))
}

/// Extract a human-readable message from a collaborator error body.
///
/// The chat and search services report failures through a `detail`
/// field: either a plain string, or a structured list whose first
/// element carries a `msg` field. Anything else yields `fallback`.
pub(crate) fn error_detail(body: &serde_json::Value, fallback: &str) -> String {
    match &body["detail"] {
        serde_json::Value::String(detail) => detail.clone(),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item["msg"].as_str())
            .map_or_else(|| fallback.to_owned(), str::to_owned),
        _ => fallback.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use serde_json::json;

    #[test]
    fn error_detail_plain_string() {
        let body = json!({"detail": "model overloaded"});
        assert_eq!(error_detail(&body, "fallback"), "model overloaded");
    }

    #[test]
    fn error_detail_structured_list() {
        let body = json!({"detail": [{"loc": ["body", "messages"], "msg": "field required"}]});
        assert_eq!(error_detail(&body, "fallback"), "field required");
    }

    #[test]
    fn error_detail_missing_falls_back() {
        let body = json!({"something": "else"});
        assert_eq!(error_detail(&body, "request failed"), "request failed");
    }

    #[test]
    fn error_detail_malformed_list_falls_back() {
        let body = json!({"detail": [{"loc": ["body"]}]});
        assert_eq!(error_detail(&body, "request failed"), "request failed");
    }
}
