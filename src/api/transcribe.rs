//! Speech transcription collaborator adapter.
//!
//! Uploads a recorded clip as a multipart form (field `audio_file`) and
//! returns the `transcription` text. An empty or absent transcript is a
//! reported failure, not a silent empty string.

use crate::audio::AudioClip;
use crate::config::ClientConfig;
use crate::error::{ChatError, Result};
use tracing::{debug, info};

/// HTTP client for the speech transcription endpoint.
pub struct HttpTranscribeClient {
    client: reqwest::Client,
    url: String,
}

impl HttpTranscribeClient {
    /// Create a client over the configured transcription endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = super::build_client(config.http.request_timeout_secs)?;
        Ok(Self {
            client,
            url: config.endpoints.transcribe_url.clone(),
        })
    }

    /// Upload a recorded clip and return the transcript text.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Network`] on transport failures,
    /// [`ChatError::Remote`] when the collaborator rejects the upload
    /// (message taken from its `error` field when present), and
    /// [`ChatError::EmptyTranscription`] when the service answers
    /// successfully but produces no usable text.
    pub async fn transcribe(&self, clip: AudioClip) -> Result<String> {
        debug!(
            bytes = clip.wav_bytes.len(),
            duration_secs = clip.duration_secs,
            "uploading audio for transcription"
        );

        let part = reqwest::multipart::Part::bytes(clip.wav_bytes)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| ChatError::Config(format!("invalid audio mime type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("audio_file", part);

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| ChatError::Network(format!("transcription request failed: {e}")))?;

        let status = response.status();
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::Network(format!("transcription response was not JSON: {e}")))?;

        if !status.is_success() {
            let message = payload["error"]
                .as_str()
                .map_or_else(|| "transcription request failed".to_owned(), str::to_owned);
            return Err(ChatError::Remote(message));
        }

        let transcript = payload["transcription"]
            .as_str()
            .unwrap_or_default()
            .trim()
            .to_owned();
        if transcript.is_empty() {
            return Err(ChatError::EmptyTranscription);
        }

        info!(chars = transcript.len(), "transcription received");
        Ok(transcript)
    }
}
