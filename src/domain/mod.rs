pub mod card;
pub mod columns;
pub mod editor;
pub mod status;

pub use card::{Board, Card};
pub use columns::{find_card, group_cards, remap_orders, CardLocation, Columns};
pub use editor::{CardEditorState, EditorMode};
pub use status::{to_api_status, to_ui_status, ApiStatus, Status};
