use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Request failed with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Api { status: u16, message: Option<String> },

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KanbanError {
    /// Text shown to the user when an operation fails.
    ///
    /// Server-provided text wins; an API error without any falls back to the
    /// operation's generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Api { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }
}
