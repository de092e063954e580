//! Client config load/save for `~/.grant-chat/config.yaml`, plus resolution of
//! the file form into [`Settings`] (environment > file > built-in default).

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/query/";
pub const DEFAULT_HISTORY_URL: &str = "http://127.0.0.1:8000/history/";
pub const DEFAULT_CLEAR_HISTORY_URL: &str = "http://127.0.0.1:8000/clear_history/";

const DEFAULT_PACING_MS: u64 = 10;
const DEFAULT_HISTORY_LIMIT: usize = 5;
const DEFAULT_ANSWER_PREVIEW_CHARS: usize = 300;

/// Endpoints section (api_url, history_url, clear_history_url).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct EndpointsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_history_url: Option<String>,
}

/// Display section (pacing_ms, history_limit, answer_preview_chars).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct DisplaySection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pacing_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_preview_chars: Option<usize>,
}

/// Config file as written on disk. Every field is optional.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: EndpointsSection,
    #[serde(default)]
    pub display: DisplaySection,
}

/// The three query-service URLs the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub history_url: String,
    pub clear_history_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            history_url: DEFAULT_HISTORY_URL.into(),
            clear_history_url: DEFAULT_CLEAR_HISTORY_URL.into(),
        }
    }
}

/// How replies and history are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Pause after each word flush. Zero disables pacing.
    pub pacing: Duration,
    pub history_limit: usize,
    pub answer_preview_chars: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(DEFAULT_PACING_MS),
            history_limit: DEFAULT_HISTORY_LIMIT,
            answer_preview_chars: DEFAULT_ANSWER_PREVIEW_CHARS,
        }
    }
}

/// Fully resolved settings handed to the client and session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub endpoints: Endpoints,
    pub display: DisplayOptions,
}

impl Config {
    /// Resolve against the process environment.
    pub fn resolve(&self) -> Settings {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup. `API_URL`, `HISTORY_URL`
    /// and `CLEAR_HISTORY_URL` override the file; empty values are ignored.
    pub fn resolve_with<F>(&self, env: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |key: &str, file: &Option<String>, default: &str| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| file.clone())
                .unwrap_or_else(|| default.to_string())
        };

        let endpoints = Endpoints {
            api_url: pick("API_URL", &self.endpoints.api_url, DEFAULT_API_URL),
            history_url: pick(
                "HISTORY_URL",
                &self.endpoints.history_url,
                DEFAULT_HISTORY_URL,
            ),
            clear_history_url: pick(
                "CLEAR_HISTORY_URL",
                &self.endpoints.clear_history_url,
                DEFAULT_CLEAR_HISTORY_URL,
            ),
        };

        let display = DisplayOptions {
            pacing: Duration::from_millis(self.display.pacing_ms.unwrap_or(DEFAULT_PACING_MS)),
            history_limit: self.display.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
            answer_preview_chars: self
                .display
                .answer_preview_chars
                .unwrap_or(DEFAULT_ANSWER_PREVIEW_CHARS),
        };

        Settings { endpoints, display }
    }
}

/// Returns the default config file path: `~/.grant-chat/config.yaml` (platform-specific).
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".grant-chat").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

/// Load config from a YAML file.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(ConfigError::Parse)
}

/// Load config from `path`, or defaults when the file does not exist.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        load(path)
    } else {
        Ok(Config::default())
    }
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(config).map_err(ConfigError::Serialize)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Config load/save error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("cannot serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),
}
