//! Outbound context composition.
//!
//! Derives the exact ordered `{role, content}` payload for the chat
//! collaborator from the conversation state. Pure and non-mutating, so
//! the same state always composes the same payload.

use crate::message::{Message, Sender};
use serde::{Deserialize, Serialize};

/// Wire role of one context entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The leading system-prompt entry.
    System,
    /// Human input.
    User,
    /// Prior model-side context (bot replies and injected search text).
    Assistant,
}

/// One role/content pair in the outbound chat payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Wire role.
    pub role: Role,
    /// Entry text.
    pub content: String,
}

/// Compose the outbound payload from the system prompt and message log.
///
/// A system prompt that is non-empty after trimming becomes the single
/// leading `system` entry. Each message is then included iff its trimmed
/// text is non-empty AND it is selected — `hidden` does not exclude a
/// message, so injected search results still reach the model. `User`
/// maps to the `user` role; every other sender maps to `assistant`.
#[must_use]
pub fn compose(system_prompt: &str, messages: &[Message]) -> Vec<ContextEntry> {
    let mut entries = Vec::with_capacity(messages.len() + 1);

    if !system_prompt.trim().is_empty() {
        entries.push(ContextEntry {
            role: Role::System,
            content: system_prompt.to_owned(),
        });
    }

    for message in messages {
        if message.text.trim().is_empty() || !message.selected {
            continue;
        }
        let role = match message.sender {
            Sender::User => Role::User,
            Sender::Bot | Sender::System => Role::Assistant,
        };
        entries.push(ContextEntry {
            role,
            content: message.text.clone(),
        });
    }

    entries
}
