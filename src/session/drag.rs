use crate::domain::{Columns, Status};

/// What a drag carries from its start to its drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub card_id: String,
    pub from_status: Status,
}

/// A request to move a card, produced by a drop.
///
/// `to_index` is the drop position as rendered, before the card is lifted out
/// of its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub card_id: String,
    pub from_status: Status,
    pub to_status: Status,
    pub to_index: usize,
}

impl DragPayload {
    pub fn new(card_id: impl Into<String>, from_status: Status) -> Self {
        Self {
            card_id: card_id.into(),
            from_status,
        }
    }

    /// Dropped on a column's empty area: append to the end
    pub fn onto_column(&self, columns: &Columns, status: Status) -> MoveIntent {
        self.onto_card(status, columns.len(status))
    }

    /// Dropped on the card at `index`: take its slot
    pub fn onto_card(&self, status: Status, index: usize) -> MoveIntent {
        MoveIntent {
            card_id: self.card_id.clone(),
            from_status: self.from_status,
            to_status: status,
            to_index: index,
        }
    }
}
