use crate::domain::{card::Card, status::Status};
use serde::{Deserialize, Serialize};

/// Cards grouped by status, each column ordered by position.
///
/// Invariant: a card appears in exactly one column and its `order` equals its
/// index in that column. The constructors and transforms here all maintain it;
/// values are replaced wholesale rather than edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Columns {
    pub todo: Vec<Card>,
    pub in_progress: Vec<Card>,
    pub done: Vec<Card>,
}

/// Where a card currently sits on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLocation {
    pub status: Status,
    pub index: usize,
}

impl Columns {
    pub fn get(&self, status: Status) -> &[Card] {
        match status {
            Status::Todo => &self.todo,
            Status::InProgress => &self.in_progress,
            Status::Done => &self.done,
        }
    }

    fn get_mut(&mut self, status: Status) -> &mut Vec<Card> {
        match status {
            Status::Todo => &mut self.todo,
            Status::InProgress => &mut self.in_progress,
            Status::Done => &mut self.done,
        }
    }

    pub fn len(&self, status: Status) -> usize {
        self.get(status).len()
    }

    /// Total number of cards on the board
    pub fn total(&self) -> usize {
        Status::ALL.iter().map(|status| self.len(*status)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Status, &[Card])> {
        Status::ALL.into_iter().map(move |status| (status, self.get(status)))
    }

    pub fn locate(&self, card_id: &str) -> Option<CardLocation> {
        self.iter().find_map(|(status, cards)| {
            cards
                .iter()
                .position(|card| card.id == card_id)
                .map(|index| CardLocation { status, index })
        })
    }

    /// Appends a card to the end of its status column
    pub fn with_card_appended(mut self, card: Card) -> Self {
        self.get_mut(card.status).push(card);
        remap_orders(self)
    }

    /// Drops the card with the given id from whichever column holds it
    pub fn without_card(mut self, card_id: &str) -> Self {
        for status in Status::ALL {
            self.get_mut(status).retain(|card| card.id != card_id);
        }
        remap_orders(self)
    }

    /// Applies `patch` to the card matching `card_id`, wherever it is
    pub fn with_card_patched(mut self, card_id: &str, patch: impl Fn(&mut Card)) -> Self {
        for status in Status::ALL {
            for card in self.get_mut(status).iter_mut().filter(|c| c.id == card_id) {
                patch(card);
            }
        }
        remap_orders(self)
    }

    /// Moves a card to `to_status` at `to_index`.
    ///
    /// `to_index` is the drop position as seen before the card is lifted out, so
    /// a move further down the same column lands one slot earlier. Returns the
    /// new columns with the index the card actually landed at, or `None` if the
    /// card is not on the board.
    pub fn with_card_moved(
        mut self,
        card_id: &str,
        to_status: Status,
        to_index: usize,
    ) -> Option<(Self, usize)> {
        let from = self.locate(card_id)?;
        let resolved = resolve_drop_index(from, to_status, to_index);

        let mut card = self.get_mut(from.status).remove(from.index);
        card.status = to_status;

        let target = self.get_mut(to_status);
        let landed = resolved.min(target.len());
        target.insert(landed, card);

        Some((remap_orders(self), landed))
    }
}

/// Adjusts a drop index for the lifted card.
///
/// Removing the card from its own column shifts everything after it up by one,
/// so a same-column target past the source position moves back one slot.
pub fn resolve_drop_index(from: CardLocation, to_status: Status, to_index: usize) -> usize {
    if from.status == to_status && from.index < to_index {
        to_index - 1
    } else {
        to_index
    }
}

/// Partitions cards into their status columns.
///
/// Each column is sorted by the incoming `order` (ties keep their input order)
/// and then renumbered densely from zero, so gaps or duplicates from the server
/// never survive.
pub fn group_cards(cards: impl IntoIterator<Item = Card>) -> Columns {
    let mut grouped = Columns::default();

    for card in cards {
        grouped.get_mut(card.status).push(card);
    }

    for status in Status::ALL {
        // sort_by is stable
        grouped.get_mut(status).sort_by(|a, b| a.order.cmp(&b.order));
    }

    remap_orders(grouped)
}

/// Renumbers each column to match its current sequence without resorting
pub fn remap_orders(mut columns: Columns) -> Columns {
    for status in Status::ALL {
        for (index, card) in columns.get_mut(status).iter_mut().enumerate() {
            card.order = index;
        }
    }
    columns
}

/// Linear scan across all three columns
pub fn find_card<'a>(columns: &'a Columns, card_id: &str) -> Option<&'a Card> {
    columns
        .locate(card_id)
        .map(|location| &columns.get(location.status)[location.index])
}
