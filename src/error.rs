//! Error types for the lark conversation engine.

/// Top-level error type for the conversation orchestration engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The requested chat model has no configured endpoint.
    #[error("unsupported model: {model}")]
    UnsupportedModel {
        /// The model identifier the caller asked for.
        model: String,
    },

    /// Transport-level failure reaching a collaborator service.
    #[error("network error: {0}")]
    Network(String),

    /// A collaborator returned a non-success status with a structured message.
    #[error("remote error: {0}")]
    Remote(String),

    /// Microphone access was refused or no input device is available.
    #[error("microphone unavailable: {0}")]
    PermissionDenied(String),

    /// Recording-control misuse (e.g. stop without an active recording).
    #[error("invalid recorder state: {0}")]
    InvalidState(String),

    /// Transcription succeeded but produced no usable text.
    #[error("no transcript produced")]
    EmptyTranscription,

    /// Audio device, stream, or encoding error during capture.
    #[error("audio error: {0}")]
    Audio(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ChatError>;
