use std::time::Duration;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "KANBAN_API_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// How long a status message stays visible unless replaced
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub message_ttl: Duration,
    /// Per-request timeout. `None` lets a request wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            message_ttl: DEFAULT_MESSAGE_TTL,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, with the base URL taken from `KANBAN_API_URL` when set
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let config = Self::default();
        match lookup(API_URL_ENV) {
            Some(url) if !url.trim().is_empty() => config.with_api_base_url(url),
            _ => config,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
