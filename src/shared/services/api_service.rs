#[cfg(target_arch = "wasm32")]
use gloo_net::http::{Request, Response};

#[cfg(target_arch = "wasm32")]
use async_trait::async_trait;
#[cfg(target_arch = "wasm32")]
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
use crate::domain::models::{ActionResponse, ChatReply, ChatRequest};
#[cfg(target_arch = "wasm32")]
use crate::shared::errors::{ClientError, Result};
#[cfg(target_arch = "wasm32")]
use crate::shared::traits::{ChatApi, ConversationApi};

use crate::config::ClientConfig;

// API Service for the chat and conversation endpoints
#[derive(Debug, Clone)]
pub struct ApiService {
    base_url: String,
    chat_endpoint: String,
}

impl ApiService {
    pub fn new() -> Self {
        Self::from_config(&ClientConfig::default())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_endpoint: config.chat_endpoint.clone(),
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub fn chat_url(&self) -> String {
        self.url(&self.chat_endpoint)
    }

    pub fn delete_conversation_url(&self, conversation_id: &str) -> String {
        self.url(&format!(
            "/delete_conversation/{}",
            urlencoding::encode(conversation_id)
        ))
    }

    pub fn clear_chats_url(&self) -> String {
        self.url("/clear_chats")
    }

    pub fn clear_messages_url(&self, conversation_id: &str) -> String {
        self.url(&format!(
            "/clear_messages/{}",
            urlencoding::encode(conversation_id)
        ))
    }
}

impl Default for ApiService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl ApiService {
    // Non-2xx is an error; its body travels with it for callers that read it
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.ok() {
            return Err(ClientError::Http {
                status: response.status(),
                status_text: response.status_text(),
                body: response.text().await.ok(),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    async fn post_empty<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = Request::post(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl ChatApi for ApiService {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        let response = Request::post(&self.chat_url())
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(request)?)?
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl ConversationApi for ApiService {
    async fn delete_conversation(&self, conversation_id: &str) -> Result<ActionResponse> {
        let response = Request::delete(&self.delete_conversation_url(conversation_id))
            .header("Content-Type", "application/json")
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn clear_chats(&self) -> Result<ActionResponse> {
        self.post_empty(&self.clear_chats_url()).await
    }

    async fn clear_messages(&self, conversation_id: &str) -> Result<ActionResponse> {
        self.post_empty(&self.clear_messages_url(conversation_id)).await
    }
}
