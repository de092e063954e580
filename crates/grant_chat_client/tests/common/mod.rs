//! Shared helpers for integration tests: `wiremock` routes for the query
//! service, a raw socket server for byte-exact replies, and a recording
//! chat surface.

#![allow(dead_code)]

use std::net::TcpListener as StdTcpListener;
use std::time::Duration;

use grant_chat_client::{ChatSurface, Endpoints, MessageId};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const QUERY_PATH: &str = "/query/";
pub const HISTORY_PATH: &str = "/history/";
pub const CLEAR_HISTORY_PATH: &str = "/clear_history/";

/// Endpoints of a query service served by `server`.
pub fn endpoints_for(server: &MockServer) -> Endpoints {
    endpoints_at(&server.uri())
}

pub fn endpoints_at(base: &str) -> Endpoints {
    Endpoints {
        api_url: format!("{base}{QUERY_PATH}"),
        history_url: format!("{base}{HISTORY_PATH}"),
        clear_history_url: format!("{base}{CLEAR_HISTORY_PATH}"),
    }
}

/// An address where nothing listens.
pub fn dead_endpoints() -> Endpoints {
    let port = {
        let l = StdTcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    endpoints_at(&format!("http://127.0.0.1:{port}"))
}

/// Plain-text body with the given status.
pub fn text_response(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .insert_header("content-type", "text/plain; charset=utf-8")
        .set_body_string(body.to_string())
}

/// Answer `verb path` with `response` on `server`.
pub async fn mount(server: &MockServer, verb: &str, route: &str, response: ResponseTemplate) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// A query service with one history entry, a fixed answer and a clear route.
pub async fn grant_service(answer: &str) -> MockServer {
    let server = MockServer::start().await;
    mount(
        &server,
        "GET",
        HISTORY_PATH,
        text_response(
            200,
            r#"[{"question":"Earlier question","answer":"Earlier answer"}]"#,
        ),
    )
    .await;
    mount(&server, "POST", QUERY_PATH, text_response(200, answer)).await;
    mount(&server, "DELETE", CLEAR_HISTORY_PATH, ResponseTemplate::new(200)).await;
    server
}

/// Methods of every request `server` received, in order.
pub async fn received_methods(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.method.to_string())
        .collect()
}

/// Serves a byte-exact reply to every connection: `head` (status line and
/// headers), then each chunk with a short pause, then closes. Used where the
/// body must be split at chosen byte offsets or cut short, which a canned
/// `ResponseTemplate` cannot do.
pub fn raw_server(head: &'static str, chunks: Vec<Vec<u8>>) -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            loop {
                let Ok((tcp, _)) = listener.accept().await else {
                    continue;
                };
                let chunks = chunks.clone();
                tokio::spawn(async move {
                    let _ = reply_raw(tcp, head, &chunks).await;
                });
            }
        });
    });

    format!("http://{addr}")
}

async fn reply_raw(mut tcp: TcpStream, head: &str, chunks: &[Vec<u8>]) -> std::io::Result<()> {
    // Drain the request so the client sees a reply rather than a reset.
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = tcp.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
        if request_complete(&request) {
            break;
        }
    }

    tcp.write_all(head.as_bytes()).await?;
    for chunk in chunks {
        tcp.write_all(chunk).await?;
        tcp.flush().await?;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    tcp.shutdown().await
}

fn request_complete(request: &[u8]) -> bool {
    let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
    let body_len = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= end + 4 + body_len
}

/// Records every message and every update, in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub messages: Vec<String>,
    /// (message index, content) per update.
    pub updates: Vec<(usize, String)>,
}

impl RecordingSurface {
    pub fn updates_for(&self, index: usize) -> Vec<String> {
        self.updates
            .iter()
            .filter(|(i, _)| *i == index)
            .map(|(_, c)| c.clone())
            .collect()
    }
}

impl ChatSurface for RecordingSurface {
    fn send(&mut self, content: &str) -> MessageId {
        self.messages.push(content.to_string());
        MessageId(self.messages.len() - 1)
    }

    fn update(&mut self, message: MessageId, content: &str) {
        self.messages[message.0] = content.to_string();
        self.updates.push((message.0, content.to_string()));
    }
}
