//! HTTP payload types exchanged with the query service.

use serde::{Deserialize, Serialize};

/// Client → server: body of the streamed query POST.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

impl<'a> QueryRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }
}

/// Server → client: one stored question/answer pair from the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
}

/// One item of a query reply stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One decoded character of a successful reply body.
    Char(char),
    /// The service rejected the query; the line is shown to the user as-is.
    Error(String),
}
