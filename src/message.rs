//! Conversation message model and the append-only message store.
//!
//! The store owns the full conversation log for one session. History is
//! permanent for the session's lifetime: messages are never removed or
//! reordered, and the only in-place mutation is the selection toggle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Who authored a message.
///
/// `System` marks content injected by the engine itself (web search
/// results), not the system *prompt* — that lives on the session and is
/// prepended at composition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Human-authored input.
    User,
    /// Reply from the chat collaborator.
    Bot,
    /// Engine-injected content.
    System,
}

/// Attribution entry linking a message to one web search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSource {
    /// 1-based position within the formatted search block.
    pub index: usize,
    /// URL of the search result.
    pub url: String,
}

/// A single message in the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique per session, strictly increasing with insertion order.
    pub id: u64,
    /// Message content. May be empty; empty messages are excluded from
    /// outbound context at composition time.
    pub text: String,
    /// Message author.
    pub sender: Sender,
    /// Whether this message is included in future outbound context.
    pub selected: bool,
    /// Whether this message is excluded from user-facing display.
    /// Orthogonal to `selected`; set once at creation, never toggled.
    pub hidden: bool,
    /// Creation time. Immutable.
    pub timestamp: DateTime<Utc>,
    /// Search attribution, present only on messages produced alongside a
    /// web search.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_sources: Vec<SearchSource>,
}

/// The caller-provided fields of a message about to be appended.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    /// Message content.
    pub text: String,
    /// Message author.
    pub sender: Sender,
    /// Whether the message is hidden from display. Defaults to `false`.
    pub hidden: bool,
    /// Search attribution. Defaults to empty.
    pub search_sources: Vec<SearchSource>,
}

impl MessageDraft {
    /// Create a visible draft with no attribution.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
            hidden: false,
            search_sources: Vec::new(),
        }
    }

    /// Mark the draft as hidden from user-facing display.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Attach search attribution.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<SearchSource>) -> Self {
        self.search_sources = sources;
        self
    }
}

/// Append-only store for the conversation log.
///
/// Ids come from a monotone counter, so they are unique and strictly
/// increasing with insertion order regardless of how the log is read.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_id: u64,
}

impl MessageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the tail of the log and return it.
    ///
    /// Assigns the next id and the creation timestamp; `selected`
    /// defaults to `true`. Pure in-memory mutation, no failure modes.
    pub fn append(&mut self, draft: MessageDraft) -> &Message {
        self.next_id += 1;
        let index = self.messages.len();
        self.messages.push(Message {
            id: self.next_id,
            text: draft.text,
            sender: draft.sender,
            selected: true,
            hidden: draft.hidden,
            timestamp: Utc::now(),
            search_sources: draft.search_sources,
        });
        &self.messages[index]
    }

    /// Flip the `selected` flag on the matching message, returning the
    /// new value. Silent no-op (`None`) when the id is absent.
    pub fn toggle_selection(&mut self, id: u64) -> Option<bool> {
        let message = self.messages.iter_mut().find(|m| m.id == id)?;
        message.selected = !message.selected;
        debug!(id, selected = message.selected, "message selection toggled");
        Some(message.selected)
    }

    /// Newest message carrying search attribution, if any.
    ///
    /// Scans backward for the first hidden message whose
    /// `search_sources` is non-empty.
    #[must_use]
    pub fn find_latest_with_sources(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.hidden && !m.search_sources.is_empty())
    }

    /// The full log in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Look up a message by id.
    #[must_use]
    pub fn get(&self, id: u64) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Number of stored messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True iff no message has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn append_assigns_monotonic_ids() {
        let mut store = MessageStore::new();
        let mut previous = 0;
        for i in 0..5 {
            let id = store
                .append(MessageDraft::new(Sender::User, format!("msg {i}")))
                .id;
            assert!(id > previous, "ids must strictly increase");
            previous = id;
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn append_defaults_selected_and_visible() {
        let mut store = MessageStore::new();
        let message = store.append(MessageDraft::new(Sender::Bot, "hi"));
        assert!(message.selected);
        assert!(!message.hidden);
        assert!(message.search_sources.is_empty());
    }

    #[test]
    fn hidden_draft_stays_hidden_and_selected() {
        let mut store = MessageStore::new();
        let message = store.append(MessageDraft::new(Sender::System, "results").hidden());
        assert!(message.hidden);
        assert!(message.selected);
    }

    #[test]
    fn toggle_flips_and_double_toggle_restores() {
        let mut store = MessageStore::new();
        let id = store.append(MessageDraft::new(Sender::User, "hi")).id;

        assert_eq!(store.toggle_selection(id), Some(false));
        assert_eq!(store.toggle_selection(id), Some(true));
        let message = store.get(id).unwrap();
        assert!(message.selected);
    }

    #[test]
    fn toggle_changes_nothing_but_selected() {
        let mut store = MessageStore::new();
        let id = store.append(MessageDraft::new(Sender::User, "hi").hidden()).id;
        let before = store.get(id).unwrap().clone();

        store.toggle_selection(id);
        let after = store.get(id).unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.text, before.text);
        assert_eq!(after.hidden, before.hidden);
        assert_eq!(after.timestamp, before.timestamp);
        assert_ne!(after.selected, before.selected);
    }

    #[test]
    fn toggle_unknown_id_is_a_no_op() {
        let mut store = MessageStore::new();
        store.append(MessageDraft::new(Sender::User, "hi"));
        assert_eq!(store.toggle_selection(999), None);
        assert!(store.messages()[0].selected);
    }

    #[test]
    fn find_latest_with_sources_prefers_newest_hidden() {
        let mut store = MessageStore::new();
        let old_sources = vec![SearchSource {
            index: 1,
            url: "https://old.example".into(),
        }];
        let new_sources = vec![SearchSource {
            index: 1,
            url: "https://new.example".into(),
        }];
        store.append(
            MessageDraft::new(Sender::System, "old results")
                .hidden()
                .with_sources(old_sources),
        );
        store.append(MessageDraft::new(Sender::User, "question"));
        store.append(
            MessageDraft::new(Sender::System, "new results")
                .hidden()
                .with_sources(new_sources),
        );

        let found = store.find_latest_with_sources().unwrap();
        assert_eq!(found.search_sources[0].url, "https://new.example");
    }

    #[test]
    fn find_latest_with_sources_ignores_visible_messages() {
        let mut store = MessageStore::new();
        store.append(
            MessageDraft::new(Sender::Bot, "reply").with_sources(vec![SearchSource {
                index: 1,
                url: "https://visible.example".into(),
            }]),
        );
        assert!(store.find_latest_with_sources().is_none());
    }

    #[test]
    fn find_latest_with_sources_empty_store() {
        let store = MessageStore::new();
        assert!(store.find_latest_with_sources().is_none());
        assert!(store.is_empty());
    }
}
