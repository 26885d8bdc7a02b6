//! # Kanban Client
//!
//! Client-side session management for a REST-backed kanban board with three
//! fixed columns (To Do, In Progress, Done).
//!
//! The crate normalizes whatever shape the server returns into a fixed model,
//! keeps cards grouped by column with dense zero-based positions, and runs
//! every board and card operation as a local update paired with a remote call.
//! Rendering is left to the caller; the bundled `kanban` binary is one such
//! caller.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod payload;
pub mod session;

// Re-export commonly used types
pub use api::{BoardApi, CardPatch, HttpBoardApi, NewCard};
pub use config::ClientConfig;
pub use domain::{
    card::{Board, Card},
    columns::{find_card, group_cards, remap_orders, Columns},
    editor::{CardEditorState, EditorMode},
    status::{to_api_status, to_ui_status, ApiStatus, Status},
};
pub use error::{KanbanError, Result};
pub use payload::{normalize_board_payload, to_ui_card, NormalizedBoard};
pub use session::{BoardSession, Confirm, MoveIntent, Outcome, SessionState};
