//! JSON payloads exchanged with the dashboard's `/api/chat` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat::ConversationEntry;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub restaurant_id: String,
    pub message: String,
    /// Prior turns, oldest first, already truncated to the history limit.
    pub history: Vec<ConversationEntry>,
    pub session_id: String,
}

/// Successful reply body. `reply` may be missing or blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
}

/// Raw status and body returned by a transport, before interpretation.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Extract the server-provided `detail` message from an error body.
    ///
    /// Accepts both a plain string and the list-of-objects form produced by
    /// request validation failures (first `msg` wins).
    pub fn detail(&self) -> Option<String> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        let detail = value.get("detail")?;
        let message = match detail {
            Value::String(s) => s.trim().to_string(),
            Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg").and_then(Value::as_str))
                .map(|s| s.trim().to_string())?,
            _ => return None,
        };
        if message.is_empty() { None } else { Some(message) }
    }
}
