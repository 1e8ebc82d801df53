//! Chat completion collaborator adapter.
//!
//! Sends the composed `{model, messages}` payload to the endpoint the
//! configuration maps the model to, and surfaces the collaborator's
//! `{response, model_used}` reply.

use crate::config::ClientConfig;
use crate::context::ContextEntry;
use crate::error::{ChatError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request body for the chat completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Target model identifier.
    pub model: String,
    /// Ordered role/content payload from the context composer.
    pub messages: Vec<ContextEntry>,
}

/// Successful reply from the chat collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Generated reply text.
    pub response: String,
    /// Which model actually served the request.
    pub model_used: String,
}

/// The chat collaborator boundary.
///
/// [`HttpChatClient`] is the production implementation; tests drive the
/// orchestrator with in-memory doubles.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one composed context payload and return the reply.
    async fn complete(&self, model: &str, messages: Vec<ContextEntry>) -> Result<ChatReply>;
}

/// HTTP client for the chat completion endpoint(s).
pub struct HttpChatClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpChatClient {
    /// Create a client over the configured endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = super::build_client(config.http.request_timeout_secs)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    async fn complete(&self, model: &str, messages: Vec<ContextEntry>) -> Result<ChatReply> {
        // Endpoint resolution happens before any network traffic, so an
        // unknown model fails fast with `UnsupportedModel`.
        let endpoint = self.config.chat_endpoint(model)?;
        debug!(model, entries = messages.len(), "sending chat request");

        let body = ChatRequest {
            model: model.to_owned(),
            messages,
        };
        let response = self
            .client
            .post(endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Network(format!("chat request failed: {e}")))?;

        let status = response.status();
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Network(format!("chat response was not JSON: {e}")))?;

        if !status.is_success() {
            return Err(ChatError::Remote(super::error_detail(
                &payload,
                "chat request failed",
            )));
        }

        let reply: ChatReply = serde_json::from_value(payload)
            .map_err(|e| ChatError::Remote(format!("malformed chat reply: {e}")))?;
        debug!(model_used = %reply.model_used, "chat reply received");
        Ok(reply)
    }
}
