//! Session lifecycle events for diagnostics.
//!
//! Provides callback-based event reporting that decouples the turn
//! protocol from any particular presentation (CLI printing, GUI state,
//! test assertions).

/// Events emitted by a [`ChatSession`](crate::session::ChatSession) at
/// defined lifecycle points of a conversational turn.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A turn has started and the user message was recorded.
    TurnStarted {
        /// Id of the recorded user message.
        message_id: u64,
    },

    /// A web search is about to run for the current turn.
    SearchStarted {
        /// The raw user text used as the query.
        query: String,
    },

    /// Web search finished and its results were stored.
    SearchCompleted {
        /// Id of the hidden message holding the formatted results.
        message_id: u64,
        /// How many results were stored.
        result_count: usize,
    },

    /// Web search produced nothing this turn; the turn continues.
    SearchSkipped {
        /// Why nothing was stored ("no results", or a failure message).
        reason: String,
    },

    /// The chat collaborator produced a reply.
    ReplyReceived {
        /// Id of the recorded bot message.
        message_id: u64,
        /// Which model actually served the request.
        model_used: String,
    },

    /// The turn has settled, successfully or not.
    TurnSettled {
        /// False when the chat collaborator failed.
        ok: bool,
    },
}

/// Callback type for receiving session events.
///
/// UIs install one via
/// [`ChatSession::with_events`](crate::session::ChatSession::with_events);
/// tests use it to assert on the turn lifecycle.
pub type EventCallback = Box<dyn Fn(SessionEvent) + Send + Sync>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn callback_receives_events_in_order() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let callback: EventCallback = Box::new(move |event| {
            let label = match &event {
                SessionEvent::TurnStarted { .. } => "turn_started",
                SessionEvent::SearchStarted { .. } => "search_started",
                SessionEvent::SearchCompleted { .. } => "search_completed",
                SessionEvent::SearchSkipped { .. } => "search_skipped",
                SessionEvent::ReplyReceived { .. } => "reply_received",
                SessionEvent::TurnSettled { .. } => "turn_settled",
            };
            let Ok(mut guard) = sink.lock() else {
                return;
            };
            guard.push(label.to_owned());
        });

        callback(SessionEvent::TurnStarted { message_id: 1 });
        callback(SessionEvent::SearchStarted {
            query: "weather".into(),
        });
        callback(SessionEvent::SearchSkipped {
            reason: "no results".into(),
        });
        callback(SessionEvent::TurnSettled { ok: true });

        let guard = seen.lock().unwrap();
        assert_eq!(
            *guard,
            vec![
                "turn_started",
                "search_started",
                "search_skipped",
                "turn_settled"
            ]
        );
    }

    #[test]
    fn settle_event_carries_outcome() {
        let last: Arc<Mutex<Option<bool>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&last);
        let callback: EventCallback = Box::new(move |event| {
            if let SessionEvent::TurnSettled { ok } = event {
                let Ok(mut guard) = sink.lock() else {
                    return;
                };
                *guard = Some(ok);
            }
        });

        callback(SessionEvent::TurnSettled { ok: false });
        assert_eq!(*last.lock().unwrap(), Some(false));
    }
}
