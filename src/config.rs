//! Configuration for collaborator endpoints and the model catalog.
//!
//! Defaults match a local development stack (chat on 8000, transcription
//! on 8001, web search on 8002); a TOML file under the user config
//! directory overrides them.

use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Collaborator endpoint URLs.
    pub endpoints: EndpointsConfig,
    /// Selectable chat models.
    pub models: Vec<ModelEntry>,
    /// Model used when the caller has not chosen one.
    pub default_model: String,
    /// HTTP client behaviour.
    pub http: HttpConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointsConfig::default(),
            models: vec![
                ModelEntry::new("gpt-4o", "GPT-4o"),
                ModelEntry::new("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet"),
                ModelEntry::new("deepseek-chat", "Deepseek Chat"),
                ModelEntry::new("deepseek-r1-distill-qwen-7b", "Deepseek R1 Distill Qwen 7B"),
            ],
            default_model: "gpt-4o".to_owned(),
            http: HttpConfig::default(),
        }
    }
}

/// Endpoint URLs for the three collaborator services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Chat completion endpoint used by models without an override.
    pub chat_url: String,
    /// Per-model chat endpoint overrides (model id → URL), for models
    /// served from a different host than the main chat service.
    pub chat_overrides: BTreeMap<String, String>,
    /// Web search endpoint.
    pub search_url: String,
    /// Speech transcription endpoint.
    pub transcribe_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            chat_url: "http://localhost:8000/chat".to_owned(),
            chat_overrides: BTreeMap::new(),
            search_url: "http://localhost:8002/search".to_owned(),
            transcribe_url: "http://localhost:8001/transcribe/".to_owned(),
        }
    }
}

/// One selectable chat model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Model identifier sent to the chat collaborator.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
}

impl ModelEntry {
    /// Create a catalog entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// HTTP client behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds. 0 disables the timeout; collaborator
    /// calls then run to completion or failure with no deadline.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 0,
        }
    }
}

impl ClientConfig {
    /// Default config file location (`~/.config/lark/config.toml` on Linux).
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lark")
            .join("config.toml")
    }

    /// Load configuration from the default path, falling back to the
    /// built-in defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed, or
    /// fails validation.
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path();
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError::Config`] if the file cannot be read or
    /// parsed, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ChatError::Config(format!("failed to read config {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| {
            ChatError::Config(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates this configuration, returning an error if any field is
    /// invalid.
    ///
    /// Checks:
    /// - all three endpoint URLs are non-empty
    /// - the model catalog is non-empty
    /// - `default_model` appears in the catalog
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.chat_url.trim().is_empty() {
            return Err(ChatError::Config("endpoints.chat_url is empty".into()));
        }
        if self.endpoints.search_url.trim().is_empty() {
            return Err(ChatError::Config("endpoints.search_url is empty".into()));
        }
        if self.endpoints.transcribe_url.trim().is_empty() {
            return Err(ChatError::Config("endpoints.transcribe_url is empty".into()));
        }
        if self.models.is_empty() {
            return Err(ChatError::Config("model catalog is empty".into()));
        }
        if !self.models.iter().any(|m| m.id == self.default_model) {
            return Err(ChatError::Config(format!(
                "default_model '{}' is not in the model catalog",
                self.default_model
            )));
        }
        Ok(())
    }

    /// Resolve the chat endpoint for `model`.
    ///
    /// Overrides win; catalog models without one use the main chat URL.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::UnsupportedModel`] when the model is neither
    /// in the catalog nor given an endpoint override.
    pub fn chat_endpoint(&self, model: &str) -> Result<&str> {
        if let Some(url) = self.endpoints.chat_overrides.get(model) {
            return Ok(url);
        }
        if self.models.iter().any(|m| m.id == model) {
            return Ok(&self.endpoints.chat_url);
        }
        Err(ChatError::UnsupportedModel {
            model: model.to_owned(),
        })
    }

    /// Display name for a catalog model id.
    #[must_use]
    pub fn model_name(&self, id: &str) -> Option<&str> {
        self.models
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.as_str())
    }
}
