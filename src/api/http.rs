//! REST/JSON implementation of [`BoardApi`].

use crate::{
    api::{BoardApi, CardPatch, NewCard},
    config::ClientConfig,
    domain::{Board, Card, Status},
    error::{KanbanError, Result},
    payload::{normalize_board_payload, to_board, to_ui_card, NormalizedBoard},
};
use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde_json::{json, Value};
use tracing::debug;

/// Pulls a human-readable message out of an error body.
///
/// Tries `message`, `error`, then `error_description`, and falls back to the
/// raw body when it is not JSON. Empty bodies yield `None`.
fn extract_error_message(body: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "error_description"] {
            if let Some(text) = json.get(key).and_then(Value::as_str) {
                return Some(text.to_string());
            }
        }
        return None;
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Client for the board REST service
pub struct HttpBoardApi {
    client: Client,
    base_url: Url,
}

impl HttpBoardApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            KanbanError::Config(format!("invalid API URL '{}': {}", config.api_base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(KanbanError::Config(format!(
                "API URL '{}' cannot be used as a base",
                config.api_base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, method: Method, segments: &[&str], body: Option<Value>) -> Result<Response> {
        let url = self.endpoint(segments);
        debug!("board api request: {} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        Self::check_response(response).await
    }

    /// Maps a non-2xx response to [`KanbanError::Api`]
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(KanbanError::Api {
            status: status.as_u16(),
            message: extract_error_message(&body),
        })
    }

    /// Sends a request and decodes the JSON reply.
    ///
    /// An empty success body (such as a 204) is read as the server echoing the
    /// request body, and the decoders' fallbacks cover whatever that lacks.
    async fn send_json(&self, method: Method, segments: &[&str], body: Option<Value>) -> Result<Value> {
        let response = self.send(method, segments, body.clone()).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            debug!("empty response body, using the request body");
            return Ok(body.unwrap_or(Value::Null));
        }
        serde_json::from_str(&text)
            .map_err(|e| KanbanError::InvalidResponse(format!("response body is not JSON: {}", e)))
    }
}

#[async_trait]
impl BoardApi for HttpBoardApi {
    async fn get_board(&self, board_id: &str) -> Result<NormalizedBoard> {
        let payload = self
            .send_json(Method::GET, &["boards", board_id], None)
            .await?;
        Ok(normalize_board_payload(board_id, &payload))
    }

    async fn create_board(&self, name: &str) -> Result<Board> {
        let raw = self
            .send_json(Method::POST, &["boards"], Some(json!({ "name": name })))
            .await?;
        let board = to_board(&raw, "");
        if board.id.is_empty() {
            return Err(KanbanError::InvalidResponse(
                "created board has no id".to_string(),
            ));
        }
        Ok(board)
    }

    async fn update_board(&self, board_id: &str, name: &str) -> Result<Board> {
        let raw = self
            .send_json(
                Method::PATCH,
                &["boards", board_id],
                Some(json!({ "name": name })),
            )
            .await?;
        Ok(to_board(&raw, board_id))
    }

    async fn delete_board(&self, board_id: &str) -> Result<()> {
        self.send(Method::DELETE, &["boards", board_id], None).await?;
        Ok(())
    }

    async fn create_card(&self, board_id: &str, card: &NewCard) -> Result<Card> {
        let raw = self
            .send_json(
                Method::POST,
                &["boards", board_id, "cards"],
                Some(serde_json::to_value(card)?),
            )
            .await?;
        Ok(to_ui_card(&raw, Status::Todo, 0))
    }

    async fn update_card(&self, card_id: &str, patch: &CardPatch) -> Result<Card> {
        let raw = self
            .send_json(Method::PATCH, &["cards", card_id], Some(patch.to_body()))
            .await?;
        Ok(to_ui_card(
            &raw,
            patch.status.unwrap_or(Status::Todo),
            patch.order.unwrap_or(0),
        ))
    }

    async fn delete_card(&self, card_id: &str) -> Result<()> {
        self.send(Method::DELETE, &["cards", card_id], None).await?;
        Ok(())
    }
}
