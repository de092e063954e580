//! HTTP client for the query service: fetch history, streamed query, clear history.

use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use reqwest::StatusCode;
use tracing::debug;

use crate::config::Endpoints;
use crate::decode::decode_chars;
use crate::messages::{HistoryEntry, QueryRequest, StreamEvent};

/// Reply to a query: characters as they arrive, or a single error line.
pub type QueryStream = BoxStream<'static, Result<StreamEvent, ClientError>>;

/// Client error. Non-success statuses are not errors; see [`Client::post_query`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed history payload: {0}")]
    MalformedHistory(#[source] serde_json::Error),
}

/// Client for one query service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl Client {
    /// Build a client for `endpoints`. No request timeout is set; the
    /// transport defaults apply.
    pub fn new(endpoints: Endpoints) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, endpoints })
    }

    /// GET the stored history. Any non-200 status means "no history".
    pub async fn fetch_history(&self) -> Result<Vec<HistoryEntry>, ClientError> {
        let url = &self.endpoints.history_url;
        debug!(%url, "fetching history");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            debug!(%status, "history unavailable");
            return Ok(Vec::new());
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(ClientError::MalformedHistory)
    }

    /// POST `query` and stream the reply body back character by character.
    ///
    /// A non-200 status yields a stream holding exactly one
    /// [`StreamEvent::Error`]. Failing to connect returns `Err`; a transport
    /// failure after the body started arrives as an `Err` item.
    pub async fn post_query(&self, query: &str) -> Result<QueryStream, ClientError> {
        let url = &self.endpoints.api_url;
        debug!(%url, len = query.len(), "posting query");
        let response = self
            .http
            .post(url)
            .json(&QueryRequest::new(query))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%status, "query rejected");
            let line = format!("Error: API returned status code {}", status.as_u16());
            return Ok(stream::once(async move { Ok(StreamEvent::Error(line)) }).boxed());
        }

        let chars = decode_chars(response.bytes_stream()).map(|item| {
            item.map(StreamEvent::Char).map_err(ClientError::from)
        });
        Ok(chars.boxed())
    }

    /// DELETE the stored history. Any HTTP response counts as success.
    pub async fn clear_history(&self) -> Result<(), ClientError> {
        let url = &self.endpoints.clear_history_url;
        debug!(%url, "clearing history");
        let response = self.http.delete(url).send().await?;
        debug!(status = %response.status(), "clear history answered");
        Ok(())
    }
}
