//! Client configuration
//!
//! Every field has a default matching the server-rendered pages. A page may
//! override any subset with `<meta name="cinechat-config" content="{...}">`.

use std::time::Duration;

use serde::Deserialize;

use crate::shared::errors::{ClientError, Result};

/// Name of the meta tag carrying JSON overrides
pub const CONFIG_META_NAME: &str = "cinechat-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Local storage key of the persisted transcript
    pub storage_key: String,
    /// Prefix prepended to every request path; empty means same origin
    pub base_url: String,
    pub chat_endpoint: String,
    /// Where the detail page goes after deleting its conversation
    pub conversations_route: String,
    /// Banner lifetime on the conversation list page
    pub alert_dismiss_ms: u64,
    /// Banner lifetime on the conversation detail page
    pub detail_alert_dismiss_ms: u64,
    /// Collapse animation length before a list item is removed
    pub item_collapse_ms: u64,
    pub clear_all_reload_ms: u64,
    pub detail_redirect_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            storage_key: "chatMessages".to_string(),
            base_url: String::new(),
            chat_endpoint: "/chat".to_string(),
            conversations_route: "/conversations".to_string(),
            alert_dismiss_ms: 5000,
            detail_alert_dismiss_ms: 3000,
            item_collapse_ms: 300,
            clear_all_reload_ms: 500,
            detail_redirect_ms: 1000,
        }
    }
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: ClientConfig =
            serde_json::from_str(raw).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(ClientError::Config("storage_key must not be empty".into()));
        }
        if !self.chat_endpoint.starts_with('/') {
            return Err(ClientError::Config(format!(
                "chat_endpoint must be an absolute path, got {:?}",
                self.chat_endpoint
            )));
        }
        Ok(())
    }

    pub fn alert_dismiss(&self) -> Duration {
        Duration::from_millis(self.alert_dismiss_ms)
    }

    pub fn detail_alert_dismiss(&self) -> Duration {
        Duration::from_millis(self.detail_alert_dismiss_ms)
    }

    pub fn item_collapse(&self) -> Duration {
        Duration::from_millis(self.item_collapse_ms)
    }

    pub fn clear_all_reload(&self) -> Duration {
        Duration::from_millis(self.clear_all_reload_ms)
    }

    pub fn detail_redirect(&self) -> Duration {
        Duration::from_millis(self.detail_redirect_ms)
    }
}
