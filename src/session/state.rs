use crate::domain::{Board, CardEditorState, Columns};
use chrono::{DateTime, Utc};
use std::time::Duration;

use super::drag::DragPayload;

/// Transient status or error text shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self::posted_at(text, Utc::now())
    }

    pub fn posted_at(text: impl Into<String>, posted_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            posted_at,
        }
    }

    /// Whether the message is still inside its display window at `now`
    pub fn is_visible_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now < self.posted_at + ttl,
            // A ttl too large for chrono never expires.
            Err(_) => true,
        }
    }
}

/// Everything the presentation layer renders, as one snapshot.
///
/// The session replaces `columns` wholesale on every change, so a clone taken
/// by a renderer never observes a half-applied mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub board: Option<Board>,
    pub columns: Columns,
    /// Contents of the "board id" field used for loading
    pub board_id_input: String,
    /// Contents of the rename field; follows the loaded board's name
    pub board_name_draft: String,
    /// Contents of the create-board field
    pub board_create_draft: String,
    pub editor: Option<CardEditorState>,
    /// Set while a board or card operation awaits the server
    pub busy: bool,
    pub drag: Option<DragPayload>,
    pub message: Option<StatusMessage>,
}

impl SessionState {
    pub fn has_board(&self) -> bool {
        self.board.is_some()
    }

    pub fn cards_count(&self) -> usize {
        self.columns.total()
    }

    /// Card currently being dragged, for visual feedback
    pub fn dragging_card_id(&self) -> Option<&str> {
        self.drag.as_ref().map(|drag| drag.card_id.as_str())
    }

    /// Message text if it has not yet expired at `now`
    pub fn visible_message(&self, now: DateTime<Utc>, ttl: Duration) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|message| message.is_visible_at(now, ttl))
            .map(|message| message.text.as_str())
    }
}
