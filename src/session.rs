//! The conversation orchestrator: one session, one turn protocol.
//!
//! A [`ChatSession`] owns the whole conversation state — the message
//! log, the selected model, the system prompt, the auto-search toggle,
//! the transient busy flags, and the last error. All mutation flows
//! through its methods; nothing else writes to the log.

use crate::api::{ChatBackend, ChatReply, HttpChatClient, HttpSearchClient, SearchBackend};
use crate::config::ClientConfig;
use crate::context;
use crate::error::Result;
use crate::events::{EventCallback, SessionEvent};
use crate::message::{Message, MessageDraft, MessageStore, Sender};
use crate::search::{self, Enrichment};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A single logical conversation owned by one caller.
///
/// Sessions are constructed explicitly and are fully independent — no
/// process-wide state. `send_message` takes `&mut self`, so the borrow
/// checker rules out overlapping turns on one session; run several
/// sessions for parallel conversations.
pub struct ChatSession {
    store: MessageStore,
    selected_model: String,
    system_prompt: String,
    auto_web_search: bool,
    is_loading: bool,
    is_searching_web: bool,
    error: Option<String>,
    chat: Arc<dyn ChatBackend>,
    search: Arc<dyn SearchBackend>,
    events: Option<EventCallback>,
}

impl ChatSession {
    /// Create a session over the given collaborator backends.
    ///
    /// The selected model starts at the configured default; auto web
    /// search starts off.
    pub fn new(
        config: &ClientConfig,
        chat: Arc<dyn ChatBackend>,
        search: Arc<dyn SearchBackend>,
    ) -> Self {
        Self {
            store: MessageStore::new(),
            selected_model: config.default_model.clone(),
            system_prompt: String::new(),
            auto_web_search: false,
            is_loading: false,
            is_searching_web: false,
            error: None,
            chat,
            search,
            events: None,
        }
    }

    /// Convenience constructor wiring the HTTP collaborator clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let search = Arc::new(HttpSearchClient::new(&config)?);
        let chat = Arc::new(HttpChatClient::new(config.clone())?);
        Ok(Self::new(&config, chat, search))
    }

    /// Install a diagnostic event sink.
    #[must_use]
    pub fn with_events(mut self, events: EventCallback) -> Self {
        self.events = Some(events);
        self
    }

    /// The full conversation log in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    /// The model the next turn will target.
    #[must_use]
    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    /// The current system prompt (may be empty).
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Whether turns are enriched with web search results.
    #[must_use]
    pub fn auto_web_search(&self) -> bool {
        self.auto_web_search
    }

    /// True while a turn is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// True while the search collaborator is being queried.
    #[must_use]
    pub fn is_searching_web(&self) -> bool {
        self.is_searching_web
    }

    /// Last turn failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Select the chat model for future turns.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.selected_model = model.into();
        debug!(model = %self.selected_model, "model selected");
    }

    /// Replace the system prompt for future turns.
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = prompt.into();
    }

    /// Toggle web-search enrichment for future turns.
    pub fn set_auto_web_search(&mut self, enabled: bool) {
        self.auto_web_search = enabled;
        debug!(enabled, "auto web search toggled");
    }

    /// Flip a message's inclusion in future outbound context.
    ///
    /// Returns the new selection state, or `None` when the id is
    /// unknown (a silent no-op, matching the store).
    pub fn toggle_message_selection(&mut self, id: u64) -> Option<bool> {
        self.store.toggle_selection(id)
    }

    /// Clear the recorded turn failure.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Run one conversational turn.
    ///
    /// The user text is recorded unconditionally, even when empty (the
    /// composer will exclude it from context). When auto web search is
    /// on, enrichment runs to completion first and can never fail the
    /// turn. The busy flag drops on every exit path.
    ///
    /// # Errors
    ///
    /// Returns the chat collaborator failure. The same message is
    /// recorded in [`error`](Self::error) for display; the history up to
    /// and including the user message is untouched.
    pub async fn send_message(&mut self, text: &str) -> Result<()> {
        self.is_loading = true;
        self.error = None;

        let outcome = self.run_turn(text).await;

        // The reset is unconditional: collaborator failures come back
        // here as values, never as unwinds past this point.
        self.is_loading = false;

        match outcome {
            Ok(()) => {
                self.emit(SessionEvent::TurnSettled { ok: true });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "turn failed");
                self.error = Some(err.to_string());
                self.emit(SessionEvent::TurnSettled { ok: false });
                Err(err)
            }
        }
    }

    /// The fallible body of a turn: record, enrich, compose, complete.
    async fn run_turn(&mut self, text: &str) -> Result<()> {
        let user_id = self.store.append(MessageDraft::new(Sender::User, text)).id;
        self.emit(SessionEvent::TurnStarted {
            message_id: user_id,
        });
        debug!(id = user_id, "user message recorded");

        // Capture the toggle for this turn: attribution below is gated
        // on it, not on whether any older sourced message exists.
        let searched = self.auto_web_search;
        if searched {
            self.run_auto_search(text).await;
        }

        let payload = context::compose(&self.system_prompt, self.store.messages());
        debug!(
            entries = payload.len(),
            model = %self.selected_model,
            "composed outbound context"
        );

        let reply = self.chat.complete(&self.selected_model, payload).await?;

        let sources = if searched {
            self.store
                .find_latest_with_sources()
                .map(|m| m.search_sources.clone())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let ChatReply {
            response,
            model_used,
        } = reply;
        let bot_id = self
            .store
            .append(MessageDraft::new(Sender::Bot, response).with_sources(sources))
            .id;
        info!(id = bot_id, model = %model_used, "reply recorded");
        self.emit(SessionEvent::ReplyReceived {
            message_id: bot_id,
            model_used,
        });
        Ok(())
    }

    /// One auto-search pass with its busy flag held for the duration.
    async fn run_auto_search(&mut self, query: &str) {
        self.is_searching_web = true;
        self.emit(SessionEvent::SearchStarted {
            query: query.to_owned(),
        });

        let enrichment = search::enrich(&*self.search, &mut self.store, query).await;

        // Unconditional: enrichment cannot escape with an error.
        self.is_searching_web = false;

        match enrichment {
            Enrichment::Added {
                message_id,
                result_count,
            } => self.emit(SessionEvent::SearchCompleted {
                message_id,
                result_count,
            }),
            Enrichment::Empty => self.emit(SessionEvent::SearchSkipped {
                reason: "no results".to_owned(),
            }),
            Enrichment::Failed(reason) => self.emit(SessionEvent::SearchSkipped { reason }),
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(ref sink) = self.events {
            sink(event);
        }
    }
}
