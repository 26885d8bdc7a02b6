use crate::domain::{card::Card, status::Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

/// An open create/edit card form. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEditorState {
    pub mode: EditorMode,
    /// Column the card is created in, or the column of the card being edited
    pub status: Status,
    pub card_id: Option<String>,
    pub title: String,
    pub description: String,
}

impl CardEditorState {
    pub fn create(status: Status) -> Self {
        Self {
            mode: EditorMode::Create,
            status,
            card_id: None,
            title: String::new(),
            description: String::new(),
        }
    }

    pub fn edit(card: &Card) -> Self {
        Self {
            mode: EditorMode::Edit,
            status: card.status,
            card_id: Some(card.id.clone()),
            title: card.title.clone(),
            description: card.description.clone(),
        }
    }
}
