//! The board session manager.
//!
//! A [`BoardSession`] owns the client-side view of one board. Every operation
//! validates its input locally, updates the [`SessionState`] snapshot, calls
//! the [`BoardApi`] and reports the result as a transient status message.
//! Remote failures never escape as errors; they become messages and an
//! [`Outcome::Failed`].

use crate::{
    api::{BoardApi, CardPatch, NewCard},
    config::ClientConfig,
    domain::{find_card, group_cards, Card, CardEditorState, Columns, EditorMode, Status},
    error::{KanbanError, Result},
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub mod drag;
pub mod state;

pub use drag::{DragPayload, MoveIntent};
pub use state::{SessionState, StatusMessage};

pub const DELETE_BOARD_PROMPT: &str = "Delete this board and all its cards?";
pub const DELETE_CARD_PROMPT: &str = "Delete this card?";

/// Asks the user a yes/no question before a destructive operation
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// How an operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the change and local state reflects it
    Applied,
    /// Local validation failed; nothing was sent
    Rejected,
    /// The user declined the confirmation prompt
    Declined,
    /// Nothing to do (no board loaded, unknown card, unchanged name)
    Skipped,
    /// The server call failed
    Failed,
}

/// Result of the create-card calls, before it is applied locally
enum CreatedCard {
    Placed(Card),
    /// Created, but the follow-up move to the chosen column failed
    Stranded(Card, KanbanError),
}

pub struct BoardSession<A: BoardApi> {
    api: A,
    confirm: Box<dyn Confirm>,
    config: ClientConfig,
    state: SessionState,
}

impl<A: BoardApi> BoardSession<A> {
    pub fn new(api: A, confirm: impl Confirm + 'static, config: ClientConfig) -> Self {
        Self {
            api,
            confirm: Box::new(confirm),
            config,
            state: SessionState::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Message text if still within its display window
    pub fn visible_message(&self, now: DateTime<Utc>) -> Option<&str> {
        self.state.visible_message(now, self.config.message_ttl)
    }

    fn set_message(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(message = %text, "status message");
        self.state.message = Some(StatusMessage::new(text));
    }

    fn fail(&mut self, operation: &str, error: &KanbanError, fallback: &str) -> Outcome {
        warn!(operation, error = %error, "board operation failed");
        self.set_message(error.user_message(fallback));
        Outcome::Failed
    }

    // -- Form fields --

    pub fn set_board_id_input(&mut self, value: impl Into<String>) {
        self.state.board_id_input = value.into();
    }

    pub fn set_board_name_draft(&mut self, value: impl Into<String>) {
        self.state.board_name_draft = value.into();
    }

    pub fn set_board_create_draft(&mut self, value: impl Into<String>) {
        self.state.board_create_draft = value.into();
    }

    // -- Boards --

    /// Loads the board named in the board id field
    pub async fn load_board_from_input(&mut self) -> Outcome {
        let board_id = self.state.board_id_input.clone();
        self.load_board(&board_id).await
    }

    /// Fetches a board and rebuilds the columns from its cards.
    ///
    /// On failure the current board and columns are left untouched.
    pub async fn load_board(&mut self, board_id: &str) -> Outcome {
        let board_id = board_id.trim();
        if board_id.is_empty() {
            self.set_message("Enter a board ID to load.");
            return Outcome::Rejected;
        }

        self.state.busy = true;
        let result = self.api.get_board(board_id).await;
        self.state.busy = false;

        match result {
            Ok(loaded) => {
                info!(board_id = %loaded.board.id, cards = loaded.cards.len(), "board loaded");
                self.state.columns = group_cards(loaded.cards);
                self.state.board_name_draft = loaded.board.name.clone();
                self.state.board_id_input = loaded.board.id.clone();
                self.set_message(format!("Loaded board \"{}\".", loaded.board.name));
                self.state.board = Some(loaded.board);
                Outcome::Applied
            }
            Err(e) => self.fail("load board", &e, "Load failed."),
        }
    }

    /// Creates a board from the create-board field
    pub async fn create_board_from_draft(&mut self) -> Outcome {
        let name = self.state.board_create_draft.clone();
        self.create_board(&name).await
    }

    /// Creates a board and switches the session to it
    pub async fn create_board(&mut self, name: &str) -> Outcome {
        let name = name.trim();
        if name.is_empty() {
            self.set_message("Give your board a name first.");
            return Outcome::Rejected;
        }

        self.state.busy = true;
        let result = self.api.create_board(name).await;
        self.state.busy = false;

        match result {
            Ok(created) => {
                info!(board_id = %created.id, "board created");
                self.state.columns = Columns::default();
                self.state.board_name_draft = created.name.clone();
                self.state.board_create_draft.clear();
                self.state.board_id_input = created.id.clone();
                self.set_message(format!("Created board \"{}\".", created.name));
                self.state.board = Some(created);
                Outcome::Applied
            }
            Err(e) => self.fail("create board", &e, "Create failed."),
        }
    }

    /// Renames the board to the rename field's contents
    pub async fn rename_board_from_draft(&mut self) -> Outcome {
        let name = self.state.board_name_draft.clone();
        self.rename_board(&name).await
    }

    /// Renames the loaded board. An unchanged name sends nothing.
    pub async fn rename_board(&mut self, name: &str) -> Outcome {
        let Some(board) = self.state.board.clone() else {
            return Outcome::Skipped;
        };

        let name = name.trim();
        if name.is_empty() {
            self.set_message("Board name cannot be empty.");
            return Outcome::Rejected;
        }
        if name == board.name {
            self.set_message("Board name is already up to date.");
            return Outcome::Skipped;
        }

        self.state.busy = true;
        let result = self.api.update_board(&board.id, name).await;
        self.state.busy = false;

        match result {
            Ok(updated) => {
                info!(board_id = %updated.id, "board renamed");
                self.state.board_name_draft = updated.name.clone();
                self.state.board = Some(updated);
                self.set_message("Board name updated.");
                Outcome::Applied
            }
            Err(e) => self.fail("rename board", &e, "Update failed."),
        }
    }

    /// Deletes the loaded board after confirmation
    pub async fn delete_board(&mut self) -> Outcome {
        let Some(board) = self.state.board.clone() else {
            return Outcome::Skipped;
        };
        if !self.confirm.confirm(DELETE_BOARD_PROMPT) {
            return Outcome::Declined;
        }

        self.state.busy = true;
        let result = self.api.delete_board(&board.id).await;
        self.state.busy = false;

        match result {
            Ok(()) => {
                info!(board_id = %board.id, "board deleted");
                self.state.board = None;
                self.state.columns = Columns::default();
                self.state.board_name_draft.clear();
                self.state.board_id_input.clear();
                self.state.editor = None;
                self.state.drag = None;
                self.set_message("Board deleted.");
                Outcome::Applied
            }
            Err(e) => self.fail("delete board", &e, "Delete failed."),
        }
    }

    // -- Card editor --

    /// Opens a blank form for a new card in `status`
    pub fn open_create_editor(&mut self, status: Status) {
        self.state.editor = Some(CardEditorState::create(status));
    }

    /// Opens the edit form prefilled from a card on the board
    pub fn open_edit_editor(&mut self, card_id: &str) -> Result<()> {
        let card = find_card(&self.state.columns, card_id)
            .ok_or_else(|| KanbanError::CardNotFound(card_id.to_string()))?;
        self.state.editor = Some(CardEditorState::edit(card));
        Ok(())
    }

    /// Replaces the draft title and description in the open form
    pub fn update_editor(&mut self, title: impl Into<String>, description: impl Into<String>) {
        if let Some(editor) = self.state.editor.as_mut() {
            editor.title = title.into();
            editor.description = description.into();
        }
    }

    pub fn close_editor(&mut self) {
        self.state.editor = None;
    }

    /// Saves the open card form.
    ///
    /// The form stays open when validation or the server call fails.
    pub async fn submit_editor(&mut self) -> Outcome {
        let (Some(board), Some(editor)) = (self.state.board.clone(), self.state.editor.clone())
        else {
            return Outcome::Skipped;
        };

        let title = editor.title.trim().to_string();
        if title.is_empty() {
            self.set_message("Card title is required.");
            return Outcome::Rejected;
        }
        let description = editor.description.trim().to_string();

        match editor.mode {
            EditorMode::Create => {
                self.state.busy = true;
                let result = self
                    .create_card_in(&board.id, editor.status, NewCard { title, description })
                    .await;
                self.state.busy = false;

                match result {
                    Ok(CreatedCard::Placed(card)) => {
                        info!(card_id = %card.id, status = card.status.as_str(), "card created");
                        self.state.columns =
                            std::mem::take(&mut self.state.columns).with_card_appended(card);
                        self.state.editor = None;
                        self.set_message("Card created.");
                        Outcome::Applied
                    }
                    Ok(CreatedCard::Stranded(card, e)) => {
                        // The card exists server-side in its original column;
                        // show it there so the board matches the server.
                        warn!(card_id = %card.id, "card created but not moved");
                        self.state.columns =
                            std::mem::take(&mut self.state.columns).with_card_appended(card);
                        self.state.editor = None;
                        self.fail("create card", &e, "Save failed.")
                    }
                    Err(e) => self.fail("create card", &e, "Save failed."),
                }
            }
            EditorMode::Edit => {
                let Some(card_id) = editor.card_id else {
                    return Outcome::Skipped;
                };

                self.state.busy = true;
                let result = self
                    .api
                    .update_card(&card_id, &CardPatch::content(title, description))
                    .await;
                self.state.busy = false;

                match result {
                    Ok(updated) => {
                        info!(card_id = %card_id, "card updated");
                        self.state.columns = std::mem::take(&mut self.state.columns)
                            .with_card_patched(&card_id, |card| {
                                card.title = updated.title.clone();
                                card.description = updated.description.clone();
                            });
                        self.state.editor = None;
                        self.set_message("Card updated.");
                        Outcome::Applied
                    }
                    Err(e) => self.fail("update card", &e, "Save failed."),
                }
            }
        }
    }

    /// Creates a card, then moves it if the form targeted another column.
    ///
    /// The server always creates into `todo`, so a different target costs a
    /// second call placing the card at the end of that column.
    async fn create_card_in(
        &self,
        board_id: &str,
        target: Status,
        new_card: NewCard,
    ) -> Result<CreatedCard> {
        let created = self.api.create_card(board_id, &new_card).await?;
        if created.status == target {
            return Ok(CreatedCard::Placed(created));
        }

        let order = self.state.columns.len(target);
        match self
            .api
            .update_card(&created.id, &CardPatch::placement(target, order))
            .await
        {
            Ok(moved) => Ok(CreatedCard::Placed(Card {
                id: created.id,
                title: moved.title,
                description: moved.description,
                status: moved.status,
                order,
            })),
            Err(e) => Ok(CreatedCard::Stranded(created, e)),
        }
    }

    // -- Cards --

    /// Deletes a card after confirmation
    pub async fn delete_card(&mut self, card_id: &str) -> Outcome {
        if self.state.board.is_none() {
            return Outcome::Skipped;
        }
        if !self.confirm.confirm(DELETE_CARD_PROMPT) {
            return Outcome::Declined;
        }

        self.state.busy = true;
        let result = self.api.delete_card(card_id).await;
        self.state.busy = false;

        match result {
            Ok(()) => {
                info!(card_id, "card deleted");
                self.state.columns = std::mem::take(&mut self.state.columns).without_card(card_id);
                self.set_message("Card deleted.");
                Outcome::Applied
            }
            Err(e) => self.fail("delete card", &e, "Delete failed."),
        }
    }

    /// Moves a card, updating the board before the server confirms.
    ///
    /// If the server rejects the move the previous columns are restored.
    pub async fn move_card(&mut self, intent: MoveIntent) -> Outcome {
        if self.state.board.is_none() {
            return Outcome::Skipped;
        }

        let previous = self.state.columns.clone();
        if let Some(location) = previous.locate(&intent.card_id) {
            if location.status != intent.from_status {
                debug!(
                    card_id = %intent.card_id,
                    expected = intent.from_status.as_str(),
                    actual = location.status.as_str(),
                    "move source differs from card location"
                );
            }
        }
        let Some((next, landed)) =
            previous
                .clone()
                .with_card_moved(&intent.card_id, intent.to_status, intent.to_index)
        else {
            return Outcome::Skipped;
        };
        self.state.columns = next;

        let patch = CardPatch::placement(intent.to_status, landed);
        match self.api.update_card(&intent.card_id, &patch).await {
            Ok(_) => {
                info!(
                    card_id = %intent.card_id,
                    status = intent.to_status.as_str(),
                    order = landed,
                    "card moved"
                );
                self.set_message("Card moved.");
                Outcome::Applied
            }
            Err(e) => {
                warn!(card_id = %intent.card_id, "rolling back move");
                self.state.columns = previous;
                self.fail("move card", &e, "Move failed.")
            }
        }
    }

    // -- Drag and drop --

    pub fn drag_start(&mut self, card_id: impl Into<String>, from_status: Status) {
        self.state.drag = Some(DragPayload::new(card_id, from_status));
    }

    /// Clears the dragging marker whether or not a drop happened
    pub fn drag_end(&mut self) {
        self.state.drag = None;
    }

    /// Drop onto a column: the card goes to the end of it
    pub async fn drop_on_column(&mut self, status: Status) -> Outcome {
        let Some(drag) = self.state.drag.clone() else {
            return Outcome::Skipped;
        };
        let intent = drag.onto_column(&self.state.columns, status);
        self.move_card(intent).await
    }

    /// Drop onto the card at `index` in `status`
    pub async fn drop_on_card(&mut self, status: Status, index: usize) -> Outcome {
        let Some(drag) = self.state.drag.clone() else {
            return Outcome::Skipped;
        };
        self.move_card(drag.onto_card(status, index)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Board;
    use crate::payload::NormalizedBoard;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory API that records every call
    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
        board: Mutex<Option<NormalizedBoard>>,
        failures: Mutex<HashMap<&'static str, Option<String>>>,
        stalled: Mutex<HashSet<&'static str>>,
        next_id: AtomicUsize,
    }

    impl FakeApi {
        fn with_board(board: Board, cards: Vec<Card>) -> Self {
            let api = Self::default();
            *api.board.lock().unwrap() = Some(NormalizedBoard { board, cards });
            api
        }

        fn fail(&self, op: &'static str, message: Option<&str>) {
            self.failures
                .lock()
                .unwrap()
                .insert(op, message.map(str::to_string));
        }

        /// Makes `op` hang after recording the call
        fn stall(&self, op: &'static str) {
            self.stalled.lock().unwrap().insert(op);
        }

        async fn wait_if_stalled(&self, op: &'static str) {
            let stalled = self.stalled.lock().unwrap().contains(op);
            if stalled {
                std::future::pending::<()>().await;
            }
        }

        fn record(&self, op: &'static str, detail: String) -> Result<()> {
            self.calls.lock().unwrap().push(format!("{} {}", op, detail));
            match self.failures.lock().unwrap().get(op) {
                Some(message) => Err(KanbanError::Api {
                    status: 500,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BoardApi for FakeApi {
        async fn get_board(&self, board_id: &str) -> Result<NormalizedBoard> {
            self.record("get_board", board_id.to_string())?;
            self.wait_if_stalled("get_board").await;
            self.board.lock().unwrap().clone().ok_or(KanbanError::Api {
                status: 404,
                message: Some("Board not found".to_string()),
            })
        }

        async fn create_board(&self, name: &str) -> Result<Board> {
            self.record("create_board", name.to_string())?;
            Ok(Board::new("new-board", name))
        }

        async fn update_board(&self, board_id: &str, name: &str) -> Result<Board> {
            self.record("update_board", format!("{} {}", board_id, name))?;
            Ok(Board::new(board_id, format!("{} (server)", name)))
        }

        async fn delete_board(&self, board_id: &str) -> Result<()> {
            self.record("delete_board", board_id.to_string())
        }

        async fn create_card(&self, board_id: &str, card: &NewCard) -> Result<Card> {
            self.record("create_card", format!("{} {}", board_id, card.title))?;
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            Ok(Card::new(format!("new-{}", id), card.title.clone(), Status::Todo)
                .with_description(card.description.clone()))
        }

        async fn update_card(&self, card_id: &str, patch: &CardPatch) -> Result<Card> {
            self.record("update_card", format!("{} {}", card_id, patch.to_body()))?;
            Ok(Card {
                id: card_id.to_string(),
                title: patch.title.clone().unwrap_or_else(|| "Server title".to_string()),
                description: patch.description.clone().unwrap_or_default(),
                status: patch.status.unwrap_or(Status::Todo),
                order: patch.order.unwrap_or(0),
            })
        }

        async fn delete_card(&self, card_id: &str) -> Result<()> {
            self.record("delete_card", card_id.to_string())?;
            self.wait_if_stalled("delete_card").await;
            Ok(())
        }
    }

    fn abc_cards() -> Vec<Card> {
        vec![
            Card::new("a", "A", Status::Todo).with_order(0),
            Card::new("b", "B", Status::Todo).with_order(1),
            Card::new("c", "C", Status::Todo).with_order(2),
        ]
    }

    fn ids(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    fn message(session: &BoardSession<FakeApi>) -> &str {
        session
            .state()
            .message
            .as_ref()
            .map(|m| m.text.as_str())
            .unwrap_or("")
    }

    fn session_with(api: FakeApi, confirm: bool) -> BoardSession<FakeApi> {
        BoardSession::new(api, move |_: &str| confirm, ClientConfig::default())
    }

    async fn loaded_session() -> BoardSession<FakeApi> {
        let api = FakeApi::with_board(Board::new("b1", "Roadmap"), abc_cards());
        let mut session = session_with(api, true);
        assert_eq!(session.load_board("b1").await, Outcome::Applied);
        session
    }

    #[tokio::test]
    async fn test_load_board_groups_cards() {
        let api = FakeApi::with_board(
            Board::new("b1", "Roadmap"),
            vec![
                Card::new("d", "D", Status::Done).with_order(5),
                Card::new("c", "C", Status::Todo).with_order(9),
                Card::new("a", "A", Status::Todo).with_order(1),
            ],
        );
        let mut session = session_with(api, true);

        assert_eq!(session.load_board("  b1 ").await, Outcome::Applied);

        let state = session.state();
        assert_eq!(state.board, Some(Board::new("b1", "Roadmap")));
        assert_eq!(ids(&state.columns.todo), vec!["a", "c"]);
        assert_eq!(state.columns.todo[1].order, 1);
        assert_eq!(state.columns.done[0].order, 0);
        assert_eq!(state.board_name_draft, "Roadmap");
        assert_eq!(state.board_id_input, "b1");
        assert!(!state.busy);
        assert_eq!(message(&session), "Loaded board \"Roadmap\".");
        assert_eq!(session.api().calls(), vec!["get_board b1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_while_load_in_flight() {
        let mut session = loaded_session().await;
        assert!(!session.state().busy);
        session.api().stall("get_board");

        let result =
            tokio::time::timeout(std::time::Duration::from_secs(5), session.load_board("b1")).await;

        assert!(result.is_err());
        assert!(session.state().busy);
        assert_eq!(session.api().calls(), vec!["get_board b1", "get_board b1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_while_delete_in_flight() {
        let mut session = loaded_session().await;
        session.api().stall("delete_card");

        let result =
            tokio::time::timeout(std::time::Duration::from_secs(5), session.delete_card("b")).await;

        assert!(result.is_err());
        assert!(session.state().busy);
        assert_eq!(session.state().columns.todo.len(), 3);
    }

    #[tokio::test]
    async fn test_load_board_rejects_blank_id() {
        let mut session = session_with(FakeApi::default(), true);

        assert_eq!(session.load_board("   ").await, Outcome::Rejected);
        assert_eq!(message(&session), "Enter a board ID to load.");
        assert!(session.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_existing_state() {
        let mut session = loaded_session().await;
        session.api().fail("get_board", Some("Board not found"));

        assert_eq!(session.load_board("b2").await, Outcome::Failed);
        assert_eq!(message(&session), "Board not found");
        assert_eq!(session.state().board, Some(Board::new("b1", "Roadmap")));
        assert_eq!(session.state().cards_count(), 3);
        assert!(!session.state().busy);
    }

    #[tokio::test]
    async fn test_load_failure_without_text_uses_fallback() {
        let api = FakeApi::default();
        api.fail("get_board", None);
        let mut session = session_with(api, true);

        session.set_board_id_input("b1");
        assert_eq!(session.load_board_from_input().await, Outcome::Failed);
        assert_eq!(message(&session), "Load failed.");
    }

    #[tokio::test]
    async fn test_create_board_replaces_state() {
        let mut session = loaded_session().await;
        session.set_board_create_draft("  Sprint 4 ");

        assert_eq!(session.create_board_from_draft().await, Outcome::Applied);

        let state = session.state();
        assert_eq!(state.board, Some(Board::new("new-board", "Sprint 4")));
        assert!(state.columns.is_empty());
        assert!(state.board_create_draft.is_empty());
        assert_eq!(state.board_id_input, "new-board");
        assert_eq!(message(&session), "Created board \"Sprint 4\".");
    }

    #[tokio::test]
    async fn test_create_board_rejects_blank_name() {
        let mut session = session_with(FakeApi::default(), true);

        assert_eq!(session.create_board(" ").await, Outcome::Rejected);
        assert_eq!(message(&session), "Give your board a name first.");
        assert!(session.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_rename_to_same_name_is_a_no_op() {
        let mut session = loaded_session().await;

        assert_eq!(session.rename_board(" Roadmap ").await, Outcome::Skipped);
        assert_eq!(message(&session), "Board name is already up to date.");
        assert_eq!(session.api().calls(), vec!["get_board b1"]);
    }

    #[tokio::test]
    async fn test_rename_uses_server_name() {
        let mut session = loaded_session().await;
        session.set_board_name_draft("Plan");

        assert_eq!(session.rename_board_from_draft().await, Outcome::Applied);
        assert_eq!(session.state().board.as_ref().unwrap().name, "Plan (server)");
        assert_eq!(session.state().board_name_draft, "Plan (server)");
        assert_eq!(message(&session), "Board name updated.");
    }

    #[tokio::test]
    async fn test_rename_rejects_blank_and_needs_board() {
        let mut empty = session_with(FakeApi::default(), true);
        assert_eq!(empty.rename_board("x").await, Outcome::Skipped);

        let mut session = loaded_session().await;
        assert_eq!(session.rename_board("").await, Outcome::Rejected);
        assert_eq!(message(&session), "Board name cannot be empty.");
    }

    #[tokio::test]
    async fn test_delete_board_requires_confirmation() {
        let api = FakeApi::with_board(Board::new("b1", "Roadmap"), abc_cards());
        let mut session = session_with(api, false);
        session.load_board("b1").await;

        assert_eq!(session.delete_board().await, Outcome::Declined);
        assert!(session.state().has_board());
        assert_eq!(session.api().calls(), vec!["get_board b1"]);
    }

    #[tokio::test]
    async fn test_delete_board_clears_state() {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&prompts);
        let api = FakeApi::with_board(Board::new("b1", "Roadmap"), abc_cards());
        let mut session = BoardSession::new(
            api,
            move |prompt: &str| {
                seen.lock().unwrap().push(prompt.to_string());
                true
            },
            ClientConfig::default(),
        );
        session.load_board("b1").await;

        assert_eq!(session.delete_board().await, Outcome::Applied);

        let state = session.state();
        assert!(state.board.is_none());
        assert!(state.columns.is_empty());
        assert!(state.board_name_draft.is_empty());
        assert!(state.board_id_input.is_empty());
        assert_eq!(message(&session), "Board deleted.");
        assert_eq!(*prompts.lock().unwrap(), vec![DELETE_BOARD_PROMPT]);
    }

    #[tokio::test]
    async fn test_create_card_in_todo_is_one_call() {
        let mut session = loaded_session().await;
        session.open_create_editor(Status::Todo);
        session.update_editor("  New task ", " details ");

        assert_eq!(session.submit_editor().await, Outcome::Applied);

        let todo = &session.state().columns.todo;
        assert_eq!(ids(todo), vec!["a", "b", "c", "new-0"]);
        assert_eq!(todo[3].title, "New task");
        assert_eq!(todo[3].description, "details");
        assert_eq!(todo[3].order, 3);
        assert!(session.state().editor.is_none());
        assert_eq!(message(&session), "Card created.");
        assert_eq!(
            session.api().calls(),
            vec!["get_board b1", "create_card b1 New task"]
        );
    }

    #[tokio::test]
    async fn test_create_card_in_other_column_moves_it() {
        let mut session = loaded_session().await;
        session.open_create_editor(Status::Done);
        session.update_editor("Ship", "");

        assert_eq!(session.submit_editor().await, Outcome::Applied);

        let calls = session.api().calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], "create_card b1 Ship");
        assert!(calls[2].starts_with("update_card new-0"));
        assert!(calls[2].contains("\"status\":\"done\""));
        assert!(calls[2].contains("\"position\":0"));

        let state = session.state();
        assert_eq!(ids(&state.columns.done), vec!["new-0"]);
        assert_eq!(state.columns.done[0].status, Status::Done);
        assert_eq!(state.columns.done[0].order, 0);
        assert_eq!(state.columns.done[0].title, "Server title");
        assert_eq!(state.columns.todo.len(), 3);
    }

    #[tokio::test]
    async fn test_create_card_move_failure_keeps_card_in_todo() {
        let mut session = loaded_session().await;
        session.api().fail("update_card", None);
        session.open_create_editor(Status::InProgress);
        session.update_editor("Half done", "");

        assert_eq!(session.submit_editor().await, Outcome::Failed);

        let state = session.state();
        assert_eq!(ids(&state.columns.todo), vec!["a", "b", "c", "new-0"]);
        assert!(state.columns.in_progress.is_empty());
        assert!(state.editor.is_none());
        assert_eq!(message(&session), "Save failed.");
    }

    #[tokio::test]
    async fn test_submit_rejects_blank_title() {
        let mut session = loaded_session().await;
        session.open_create_editor(Status::Todo);
        session.update_editor("   ", "x");

        assert_eq!(session.submit_editor().await, Outcome::Rejected);
        assert_eq!(message(&session), "Card title is required.");
        assert!(session.state().editor.is_some());
        assert_eq!(session.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_editor_open() {
        let mut session = loaded_session().await;
        session.api().fail("create_card", Some("Board is locked"));
        session.open_create_editor(Status::Todo);
        session.update_editor("T", "");

        assert_eq!(session.submit_editor().await, Outcome::Failed);
        assert_eq!(message(&session), "Board is locked");
        assert!(session.state().editor.is_some());
        assert_eq!(session.state().cards_count(), 3);
    }

    #[tokio::test]
    async fn test_edit_card_patches_content_only() {
        let mut session = loaded_session().await;
        session.open_edit_editor("b").unwrap();
        assert_eq!(session.state().editor.as_ref().unwrap().title, "B");
        session.update_editor("B2", "more");

        assert_eq!(session.submit_editor().await, Outcome::Applied);

        let todo = &session.state().columns.todo;
        assert_eq!(ids(todo), vec!["a", "b", "c"]);
        assert_eq!(todo[1].title, "B2");
        assert_eq!(todo[1].description, "more");
        assert_eq!(todo[1].status, Status::Todo);
        assert_eq!(todo[1].order, 1);
        assert_eq!(message(&session), "Card updated.");

        let calls = session.api().calls();
        assert!(!calls[1].contains("status"));
        assert!(!calls[1].contains("position"));
    }

    #[tokio::test]
    async fn test_open_edit_editor_unknown_card() {
        let mut session = loaded_session().await;
        assert!(matches!(
            session.open_edit_editor("zzz"),
            Err(KanbanError::CardNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_close_editor_discards_draft() {
        let mut session = loaded_session().await;
        session.open_create_editor(Status::Done);
        session.close_editor();

        assert!(session.state().editor.is_none());
        assert_eq!(session.submit_editor().await, Outcome::Skipped);
    }

    #[tokio::test]
    async fn test_delete_card() {
        let mut session = loaded_session().await;

        assert_eq!(session.delete_card("a").await, Outcome::Applied);
        let todo = &session.state().columns.todo;
        assert_eq!(ids(todo), vec!["b", "c"]);
        assert_eq!(todo[0].order, 0);
        assert_eq!(message(&session), "Card deleted.");
    }

    #[tokio::test]
    async fn test_delete_card_failure_keeps_card() {
        let mut session = loaded_session().await;
        session.api().fail("delete_card", None);

        assert_eq!(session.delete_card("a").await, Outcome::Failed);
        assert_eq!(session.state().cards_count(), 3);
        assert_eq!(message(&session), "Delete failed.");
    }

    #[tokio::test]
    async fn test_move_card_to_other_column() {
        let mut session = loaded_session().await;
        let intent = MoveIntent {
            card_id: "a".to_string(),
            from_status: Status::Todo,
            to_status: Status::Done,
            to_index: 0,
        };

        assert_eq!(session.move_card(intent).await, Outcome::Applied);

        let state = session.state();
        assert_eq!(ids(&state.columns.todo), vec!["b", "c"]);
        assert_eq!(state.columns.todo[1].order, 1);
        assert_eq!(ids(&state.columns.done), vec!["a"]);
        assert_eq!(state.columns.done[0].order, 0);
        assert_eq!(message(&session), "Card moved.");

        let calls = session.api().calls();
        assert!(calls[1].contains("\"status\":\"done\""));
        assert!(calls[1].contains("\"position\":0"));
    }

    #[tokio::test]
    async fn test_move_failure_rolls_back() {
        let mut session = loaded_session().await;
        let before = session.state().columns.clone();
        session.api().fail("update_card", None);

        session.drag_start("a", Status::Todo);
        assert_eq!(session.drop_on_column(Status::InProgress).await, Outcome::Failed);

        assert_eq!(session.state().columns, before);
        assert_eq!(message(&session), "Move failed.");
    }

    #[tokio::test]
    async fn test_drag_within_column_to_end() {
        let mut session = loaded_session().await;

        session.drag_start("a", Status::Todo);
        assert_eq!(session.state().dragging_card_id(), Some("a"));
        assert_eq!(session.drop_on_column(Status::Todo).await, Outcome::Applied);
        session.drag_end();

        assert_eq!(ids(&session.state().columns.todo), vec!["b", "c", "a"]);
        assert!(session.state().dragging_card_id().is_none());
        assert!(session.api().calls()[1].contains("\"position\":2"));
    }

    #[tokio::test]
    async fn test_drop_on_card_adjusts_same_column_index() {
        let mut session = loaded_session().await;

        session.drag_start("a", Status::Todo);
        assert_eq!(session.drop_on_card(Status::Todo, 2).await, Outcome::Applied);

        assert_eq!(ids(&session.state().columns.todo), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_drop_without_drag_is_skipped() {
        let mut session = loaded_session().await;
        assert_eq!(session.drop_on_column(Status::Done).await, Outcome::Skipped);
        assert_eq!(session.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_move_unknown_card_is_skipped() {
        let mut session = loaded_session().await;
        let intent = DragPayload::new("zzz", Status::Todo).onto_card(Status::Done, 0);

        assert_eq!(session.move_card(intent).await, Outcome::Skipped);
        assert_eq!(session.api().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_card_operations_need_a_board() {
        let mut session = session_with(FakeApi::default(), true);

        assert_eq!(session.delete_card("a").await, Outcome::Skipped);
        assert_eq!(session.delete_board().await, Outcome::Skipped);
        session.open_create_editor(Status::Todo);
        session.update_editor("T", "");
        assert_eq!(session.submit_editor().await, Outcome::Skipped);
        assert!(session.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_messages_expire() {
        let session = loaded_session().await;
        let posted = session.state().message.as_ref().unwrap().posted_at;

        assert!(session.visible_message(posted).is_some());
        assert!(session
            .visible_message(posted + chrono::Duration::seconds(5))
            .is_none());
    }
}
