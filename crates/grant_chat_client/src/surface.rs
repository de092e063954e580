//! Message-based chat UI abstraction and its terminal rendering.

use std::io::Write;

use tracing::warn;

/// Handle to a message previously sent to a [`ChatSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub usize);

/// Where chat messages are shown. `update` always carries the full new
/// content of the message, replacing what was shown before.
pub trait ChatSurface {
    fn send(&mut self, content: &str) -> MessageId;
    fn update(&mut self, message: MessageId, content: &str);
}

/// Renders chat messages to an append-only writer (usually stdout).
///
/// An update that extends the shown text prints only the new suffix, so a
/// streamed reply reads as continuous text. Any other update reprints the
/// whole message after a blank line.
pub struct TerminalSurface<W: Write> {
    out: W,
    shown: Vec<String>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: Vec::new(),
        }
    }

    /// Terminate the last line.
    pub fn finish(&mut self) {
        if !self.shown.is_empty() {
            self.emit("\n");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, "failed to write to terminal");
        }
    }
}

impl<W: Write> ChatSurface for TerminalSurface<W> {
    fn send(&mut self, content: &str) -> MessageId {
        if !self.shown.is_empty() {
            self.emit("\n\n");
        }
        self.emit(content);
        self.shown.push(content.to_string());
        MessageId(self.shown.len() - 1)
    }

    fn update(&mut self, message: MessageId, content: &str) {
        let Some(previous) = self.shown.get(message.0) else {
            warn!(id = message.0, "update for unknown message");
            return;
        };
        if let Some(suffix) = content.strip_prefix(previous.as_str()) {
            self.emit(suffix);
        } else {
            self.emit("\n\n");
            self.emit(content);
        }
        self.shown[message.0] = content.to_string();
    }
}
