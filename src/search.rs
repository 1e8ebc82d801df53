//! Best-effort web search enrichment for a conversational turn.
//!
//! When auto web search is on, the turn protocol runs one search keyed
//! on the user's raw input before composing chat context. Results land
//! in the store as a single hidden system message — included in model
//! context by default, never rendered to the user — with 1-based source
//! attribution for later display against the bot reply.
//!
//! Search is enrichment, not a dependency: every failure is absorbed
//! here and the chat turn proceeds unchanged.

use crate::api::{SearchBackend, SearchHit};
use crate::message::{MessageDraft, MessageStore, SearchSource, Sender};
use tracing::{debug, info, warn};

/// Maximum characters of one result's text included in the block.
const RESULT_TEXT_LIMIT: usize = 1000;

/// Marker appended to truncated result text.
const ELLIPSIS: &str = "...";

/// Outcome of one auto-search pass.
#[derive(Debug, Clone)]
pub(crate) enum Enrichment {
    /// A hidden search message was appended to the store.
    Added {
        /// Id of the appended message.
        message_id: u64,
        /// How many results it holds.
        result_count: usize,
    },
    /// The collaborator answered with zero results.
    Empty,
    /// The collaborator failed; the failure stops here.
    Failed(String),
}

/// Run the search collaborator for `query` and store the outcome.
///
/// On success with at least one result, appends one hidden system
/// message carrying the formatted block and its source attribution.
/// Failures and empty results append nothing — whatever happens, the
/// chat turn proceeds.
pub(crate) async fn enrich(
    backend: &dyn SearchBackend,
    store: &mut MessageStore,
    query: &str,
) -> Enrichment {
    match backend.search(query).await {
        Ok(outcome) if !outcome.results.is_empty() => {
            let result_count = outcome.results.len();
            let message_id = store.append(build_search_message(query, &outcome.results)).id;
            info!(query, result_count, message_id, "stored web search results");
            Enrichment::Added {
                message_id,
                result_count,
            }
        }
        Ok(_) => {
            debug!(query, "web search returned no results");
            Enrichment::Empty
        }
        Err(err) => {
            warn!(query, error = %err, "web search failed; continuing without enrichment");
            Enrichment::Failed(err.to_string())
        }
    }
}

/// Build the hidden system message holding a formatted search block.
///
/// The message is hidden from display but selected for context, and its
/// `search_sources` mirror the 1-based indices of the formatted block.
#[must_use]
pub fn build_search_message(query: &str, hits: &[SearchHit]) -> MessageDraft {
    let sources = hits
        .iter()
        .enumerate()
        .map(|(position, hit)| SearchSource {
            index: position + 1,
            url: hit.url.clone(),
        })
        .collect();
    MessageDraft::new(Sender::System, format_results(query, hits))
        .hidden()
        .with_sources(sources)
}

/// Format the search block: a header naming the query, then one
/// `[index] text` / `Source: url` entry per result, blank-line
/// separated.
fn format_results(query: &str, hits: &[SearchHit]) -> String {
    let mut block = format!("Web search results for \"{query}\":");
    for (position, hit) in hits.iter().enumerate() {
        block.push_str("\n\n");
        block.push_str(&format!(
            "[{}] {}\nSource: {}",
            position + 1,
            truncate_text(&hit.text, RESULT_TEXT_LIMIT),
            hit.url
        ));
    }
    block
}

/// Truncate to at most `limit` characters, appending an ellipsis marker
/// when anything was cut. Counts characters, so multi-byte text is
/// never split mid-code-point.
fn truncate_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => {
            let mut truncated = text[..byte_index].to_owned();
            truncated.push_str(ELLIPSIS);
            truncated
        }
        None => text.to_owned(),
    }
}
