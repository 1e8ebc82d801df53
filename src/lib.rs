//! Lark: conversation orchestration engine for a voice-enabled AI chat client.
//!
//! Lark owns the message history of one chat conversation and decides
//! what context each turn sends to a language-model backend. A turn can
//! be enriched with web-search results, and voice input is captured
//! through a push-to-talk microphone recorder whose transcript feeds
//! back in as ordinary user text.
//!
//! # Architecture
//!
//! Independent components, leaves first:
//! - **Message store**: append-only conversation log ([`message`])
//! - **Context composer**: selection-aware outbound payload ([`context`])
//! - **Auto-search coordinator**: best-effort enrichment ([`search`])
//! - **Conversation orchestrator**: the turn protocol ([`session`])
//! - **Audio capture**: push-to-talk recording via `cpal` ([`audio`])
//!
//! The chat, web-search, and transcription services are remote HTTP
//! collaborators reached through the adapters in [`api`]. Sessions are
//! constructed explicitly — there is no ambient global state — so
//! independent conversations and deterministic tests come for free.

pub mod api;
pub mod audio;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod message;
pub mod search;
pub mod session;

pub use audio::{AudioClip, Recorder};
pub use config::ClientConfig;
pub use error::{ChatError, Result};
pub use events::{EventCallback, SessionEvent};
pub use message::{Message, MessageDraft, MessageStore, SearchSource, Sender};
pub use session::ChatSession;
