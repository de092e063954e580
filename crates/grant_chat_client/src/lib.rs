//! Chat front-end library for a grant-writing query service (config, HTTP
//! client, streamed reply relay, markdown pass, session hooks).
//! Used by the `grant-chat` terminal binary.

pub mod client;
pub mod config;
pub mod decode;
pub mod markdown;
pub mod messages;
pub mod session;
pub mod stream;
pub mod surface;

pub use client::{Client, ClientError, QueryStream};
pub use config::{default_config_path, Config, ConfigError, DisplayOptions, Endpoints, Settings};
pub use markdown::format_response;
pub use messages::{HistoryEntry, StreamEvent};
pub use session::Session;
pub use surface::{ChatSurface, MessageId, TerminalSurface};
