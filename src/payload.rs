//! Decoding of loosely-shaped server payloads into the fixed domain model.
//!
//! The backend contract is not pinned down: field names vary, statuses come in
//! two spellings and a board may arrive with its cards grouped by column, as a
//! flat list, or not at all. Everything here is a pure function from
//! `serde_json::Value` to domain types and never fails; missing or mistyped
//! fields fall back to defaults.

use crate::domain::{
    status::{status_for_column_key, to_ui_status},
    Board, Card, Status,
};
use serde_json::{Map, Value};

pub const UNTITLED_CARD: &str = "Untitled";
pub const UNTITLED_BOARD: &str = "Untitled Board";

/// A board and its cards as decoded from a payload, before column grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBoard {
    pub board: Board,
    pub cards: Vec<Card>,
}

/// The first of `keys` present on `raw` with a non-null value
fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

/// Stringifies any JSON value the way a text field would display it
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Reads a position as a finite number, before any clamping
fn order_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Reads a position as a non-negative integer.
///
/// Numeric strings and booleans are accepted. Negative values clamp to zero and
/// fractions are truncated; anything non-numeric yields `None`.
pub fn coerce_order(value: &Value) -> Option<usize> {
    order_number(value).map(|number| number.max(0.0) as usize)
}

/// Sort key for a raw card: its position as sent, else its list index
fn order_key(raw: &Value, fallback_order: usize) -> f64 {
    first_present(raw, &["order", "position"])
        .and_then(order_number)
        .unwrap_or(fallback_order as f64)
}

/// Builds a card from a raw record.
///
/// Each attribute accepts an alternate field name (`cardId`, `name`, `details`,
/// `column`, `position`); absent ids are synthesised as `<status>-<index>`.
pub fn to_ui_card(raw: &Value, fallback_status: Status, fallback_order: usize) -> Card {
    let status = first_present(raw, &["status", "column"])
        .map(to_ui_status)
        .unwrap_or(fallback_status);

    let id = first_present(raw, &["id", "cardId"])
        .map(coerce_string)
        .unwrap_or_else(|| format!("{}-{}", status.as_str(), fallback_order));

    let title = first_present(raw, &["title", "name"])
        .map(coerce_string)
        .unwrap_or_else(|| UNTITLED_CARD.to_string());

    let description = first_present(raw, &["description", "details"])
        .map(coerce_string)
        .unwrap_or_default();

    let order = first_present(raw, &["order", "position"])
        .and_then(coerce_order)
        .unwrap_or(fallback_order);

    Card {
        id,
        title,
        description,
        status,
        order,
    }
}

/// Reads a board record, falling back to `fallback_id` when it carries no id
pub fn to_board(raw: &Value, fallback_id: &str) -> Board {
    Board {
        id: first_present(raw, &["id"])
            .map(coerce_string)
            .unwrap_or_else(|| fallback_id.to_string()),
        name: first_present(raw, &["name", "title"])
            .map(coerce_string)
            .unwrap_or_else(|| UNTITLED_BOARD.to_string()),
    }
}

fn cards_from_columns(columns: &Map<String, Value>) -> Vec<(f64, Card)> {
    columns
        .iter()
        .filter_map(|(key, items)| status_for_column_key(key).map(|status| (status, items)))
        .flat_map(|(status, items)| {
            items
                .as_array()
                .into_iter()
                .flatten()
                .enumerate()
                .map(move |(index, raw)| (order_key(raw, index), to_ui_card(raw, status, index)))
        })
        .collect()
}

fn cards_from_list(items: &[Value]) -> Vec<(f64, Card)> {
    items
        .iter()
        .enumerate()
        .map(|(index, raw)| (order_key(raw, index), to_ui_card(raw, Status::Todo, index)))
        .collect()
}

/// Decodes a get-board response.
///
/// Accepted shapes, in precedence order:
/// - `{ board, columns: { todo: [..], in_progress: [..], done: [..] } }`
/// - `{ board, cards: [..] }` or `{ board, items: [..] }`
/// - a bare board record with no cards
///
/// The board record is `payload.board` when present, else the payload itself.
/// Column keys that name no known status are dropped. Cards from a flat list
/// default to `todo` with their list index as order; grouping sorts them out.
///
/// Cards come back sorted by their position as sent, so negative or fractional
/// positions that coerce to the same `order` still group in server order.
pub fn normalize_board_payload(board_id: &str, payload: &Value) -> NormalizedBoard {
    let board_source = first_present(payload, &["board"]).unwrap_or(payload);
    let board = to_board(board_source, board_id);

    let mut keyed = if let Some(columns) = payload.get("columns").and_then(Value::as_object) {
        cards_from_columns(columns)
    } else if let Some(items) = first_present(payload, &["cards", "items"]).and_then(Value::as_array)
    {
        cards_from_list(items)
    } else {
        Vec::new()
    };
    // sort_by is stable
    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));

    NormalizedBoard {
        board,
        cards: keyed.into_iter().map(|(_, card)| card).collect(),
    }
}
