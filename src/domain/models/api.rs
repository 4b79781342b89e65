use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response of `POST /chat`. Only `reply` is required for success.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response shape shared by the conversation management endpoints
/// (`/delete_conversation/{id}`, `/clear_chats`, `/clear_messages/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub deleted_count: Option<u64>,
}

impl ActionResponse {
    /// Server-provided error text, or the generic fallback
    pub fn error_text(&self) -> &str {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or("Unknown error")
    }
}
