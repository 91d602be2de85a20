//! Client configuration, read from the environment.
//!
//! Invalid values are logged and replaced by their defaults; configuration
//! never prevents startup.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_BASE_URL: &str = "LEARNHUB_API_BASE_URL";
pub const ENV_API_TIMEOUT_MS: &str = "LEARNHUB_API_TIMEOUT_MS";
pub const ENV_SESSION_DIR: &str = "LEARNHUB_SESSION_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root; endpoint paths are appended to it.
    pub api_base_url: String,
    pub timeout: Duration,
    /// Directory holding the persisted session.
    pub session_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            session_dir: default_session_dir(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_API_BASE_URL) {
            match url::Url::parse(&raw) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                    config.api_base_url = raw.trim_end_matches('/').to_string();
                }
                _ => {
                    tracing::warn!(var = ENV_API_BASE_URL, value = %raw, "not an http(s) URL; using default");
                }
            }
        }

        if let Some(raw) = lookup(ENV_API_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout = Duration::from_millis(ms),
                _ => {
                    tracing::warn!(var = ENV_API_TIMEOUT_MS, value = %raw, "not a positive integer; using default");
                }
            }
        }

        if let Some(raw) = lookup(ENV_SESSION_DIR).filter(|s| !s.trim().is_empty()) {
            config.session_dir = PathBuf::from(raw);
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn default_session_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("learnhub"))
        .unwrap_or_else(|| PathBuf::from(".learnhub"))
}
