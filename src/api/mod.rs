use crate::{
    domain::{to_api_status, ApiStatus, Board, Card, Status},
    error::Result,
    payload::NormalizedBoard,
};
use async_trait::async_trait;
use serde::Serialize;

pub mod http;

pub use http::HttpBoardApi;

/// Body of a create-card request. New cards always land in `todo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCard {
    pub title: String,
    pub description: String,
}

/// Partial card update; only the fields that are set go on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub order: Option<usize>,
}

#[derive(Serialize)]
struct CardPatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ApiStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<usize>,
}

impl CardPatch {
    pub fn content(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn placement(status: Status, order: usize) -> Self {
        Self {
            status: Some(status),
            order: Some(order),
            ..Self::default()
        }
    }

    /// JSON request body in the wire vocabulary (`in_progress`, `position`)
    pub fn to_body(&self) -> serde_json::Value {
        let body = CardPatchBody {
            title: self.title.as_deref(),
            description: self.description.as_deref(),
            status: self.status.map(to_api_status),
            position: self.order,
        };
        // A struct of strings, enums and integers always serializes.
        serde_json::to_value(body).unwrap_or_default()
    }
}

/// Remote persistence for boards and cards
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Fetches a board with its cards
    async fn get_board(&self, board_id: &str) -> Result<NormalizedBoard>;

    /// Creates an empty board
    async fn create_board(&self, name: &str) -> Result<Board>;

    /// Renames a board; the returned name is authoritative
    async fn update_board(&self, board_id: &str, name: &str) -> Result<Board>;

    /// Deletes a board together with its cards
    async fn delete_board(&self, board_id: &str) -> Result<()>;

    /// Creates a card in the board's `todo` column
    async fn create_card(&self, board_id: &str, card: &NewCard) -> Result<Card>;

    /// Updates a card
    async fn update_card(&self, card_id: &str, patch: &CardPatch) -> Result<Card>;

    /// Deletes a card
    async fn delete_card(&self, card_id: &str) -> Result<()>;
}
