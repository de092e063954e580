//! Word-by-word relay of a streamed reply onto a chat message.

use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::client::ClientError;
use crate::markdown::format_response;
use crate::messages::StreamEvent;
use crate::surface::{ChatSurface, MessageId};

/// Accumulates a reply and signals when a word boundary has been crossed.
#[derive(Debug, Default)]
pub struct WordBuffer {
    pending: String,
    full: String,
}

impl WordBuffer {
    /// Add one character. Returns the full text so far when a space closes
    /// a word; the pending fragment is then reset to what follows the space.
    pub fn push(&mut self, c: char) -> Option<&str> {
        self.pending.push(c);
        self.full.push(c);
        let (_, tail) = self.pending.rsplit_once(' ')?;
        self.pending = tail.to_string();
        Some(self.full.as_str())
    }

    /// Characters received since the last flush.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Everything received so far.
    pub fn full(&self) -> &str {
        &self.full
    }

    pub fn into_full(self) -> String {
        self.full
    }
}

/// Drive `events` onto `message`: one update per completed word (each
/// followed by `pacing`), one for a trailing fragment, then the markdown
/// formatted text. An error line or transport failure replaces the message
/// and ends the turn.
pub async fn relay_reply<S, C>(events: S, surface: &mut C, message: MessageId, pacing: Duration)
where
    S: Stream<Item = Result<StreamEvent, ClientError>>,
    C: ChatSurface + ?Sized,
{
    let mut events = std::pin::pin!(events);
    let mut words = WordBuffer::default();

    while let Some(event) = events.next().await {
        match event {
            Ok(StreamEvent::Char(c)) => {
                if let Some(full) = words.push(c) {
                    surface.update(message, full);
                    if !pacing.is_zero() {
                        tokio::time::sleep(pacing).await;
                    }
                }
            }
            Ok(StreamEvent::Error(line)) => {
                debug!(%line, "query rejected by service");
                surface.update(message, &line);
                return;
            }
            Err(e) => {
                warn!(error = %e, "reply stream failed");
                surface.update(message, &format!("An error occurred: {e}"));
                return;
            }
        }
    }

    if !words.pending().is_empty() {
        surface.update(message, words.full());
    }
    let full = words.into_full();
    debug!(chars = full.chars().count(), "reply complete");
    surface.update(message, &format_response(&full));
}
