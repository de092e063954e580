//! Chat session hooks: start (greeting and history), one turn per message, end
//! (clear history). Only a query turn ever shows a failure to the user.

use tracing::{info, warn};

use crate::client::Client;
use crate::config::DisplayOptions;
use crate::messages::HistoryEntry;
use crate::stream::relay_reply;
use crate::surface::ChatSurface;

pub const GREETING: &str =
    "Hello! How can I assist you with your Horizon Europe grant writing needs?";

/// Shown while the reply has not started streaming yet.
pub const PLACEHOLDER: &str = "Retrieving information...";

const HISTORY_HEADING: &str = "## 📜 Previous Chat History\n\n";

/// Render the first `limit` history entries, answers cut to `preview_chars`
/// characters. Returns `None` when there is nothing to show.
pub fn render_history(
    entries: &[HistoryEntry],
    limit: usize,
    preview_chars: usize,
) -> Option<String> {
    if entries.is_empty() || limit == 0 {
        return None;
    }
    let mut out = String::from(HISTORY_HEADING);
    for entry in entries.iter().take(limit) {
        let preview: String = entry.answer.chars().take(preview_chars).collect();
        out.push_str(&format!(
            "**Q:** {}\n\n**A:** {}...\n\n---\n\n",
            entry.question, preview
        ));
    }
    Some(out)
}

/// One chat session against a query service.
pub struct Session {
    client: Client,
    display: DisplayOptions,
}

impl Session {
    pub fn new(client: Client, display: DisplayOptions) -> Self {
        Self { client, display }
    }

    /// Greet, then show recent history if the service has any.
    pub async fn on_chat_start<C: ChatSurface + ?Sized>(&self, surface: &mut C) {
        surface.send(GREETING);

        match self.client.fetch_history().await {
            Ok(entries) => {
                let rendered = render_history(
                    &entries,
                    self.display.history_limit,
                    self.display.answer_preview_chars,
                );
                if let Some(text) = rendered {
                    surface.send(&text);
                }
            }
            Err(e) => warn!(error = %e, "failed to load chat history"),
        }
    }

    /// Answer one user message, streaming the reply into a new message.
    pub async fn on_message<C: ChatSurface + ?Sized>(&self, surface: &mut C, query: &str) {
        let message = surface.send(PLACEHOLDER);
        match self.client.post_query(query).await {
            Ok(events) => relay_reply(events, surface, message, self.display.pacing).await,
            Err(e) => {
                warn!(error = %e, "query failed");
                surface.update(message, &format!("An error occurred: {e}"));
            }
        }
    }

    /// Ask the service to forget this conversation.
    pub async fn on_chat_end(&self) {
        match self.client.clear_history().await {
            Ok(()) => info!("chat history cleared"),
            Err(e) => warn!(error = %e, "failed to clear chat history"),
        }
    }
}
