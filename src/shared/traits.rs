//! Seams between the page controllers and the browser
//!
//! Each controller talks to storage, the network, the clock and the user
//! through these traits. The browser implementations live in `app::web`;
//! tests swap in recording doubles.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::models::{ActionResponse, ChatReply, ChatRequest};
use crate::shared::errors::Result;

/// Synchronous string key-value store (browser local storage)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// The reply endpoint
#[async_trait(?Send)]
pub trait ChatApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// Conversation management endpoints
#[async_trait(?Send)]
pub trait ConversationApi {
    async fn delete_conversation(&self, conversation_id: &str) -> Result<ActionResponse>;
    async fn clear_chats(&self) -> Result<ActionResponse>;
    async fn clear_messages(&self, conversation_id: &str) -> Result<ActionResponse>;
}

/// Blocking yes/no prompt
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

#[async_trait(?Send)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Page-level navigation
pub trait Navigator {
    fn reload(&self);
    fn navigate(&self, path: &str);
}

/// Source of the display time stamped on new messages
pub trait Clock {
    fn now_label(&self) -> String;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_label(&self) -> String {
        crate::domain::models::message::format_time(&chrono::Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_label_shape() {
        let label = SystemClock.now_label();
        // "HH:MM AM"
        assert_eq!(label.len(), 8);
        assert_eq!(&label[2..3], ":");
        assert!(label.ends_with("AM") || label.ends_with("PM"));
    }
}
