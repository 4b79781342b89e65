//! Single conversation page: delete it, or clear its messages

use std::rc::Rc;

use crate::app::notifications::{Notice, Notifier};
use crate::app::ActionOutcome;
use crate::config::ClientConfig;
use crate::domain::models::ActionResponse;
use crate::shared::errors::{ClientError, Result};
use crate::shared::logging::{self, LogOperation};
use crate::shared::traits::{Confirmer, ConversationApi, Navigator, Sleeper};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this conversation?";
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear all messages in this conversation?";

/// A non-2xx reply carrying an action response body is a rejection
fn with_rejection_body(result: Result<ActionResponse>) -> Result<ActionResponse> {
    let err = match result {
        Ok(response) => return Ok(response),
        Err(err) => err,
    };
    let rejected = match &err {
        ClientError::Http { body: Some(body), .. } => {
            serde_json::from_str::<ActionResponse>(body).ok()
        }
        _ => None,
    };
    match rejected {
        Some(response) => Ok(ActionResponse {
            success: false,
            ..response
        }),
        None => Err(err),
    }
}

pub struct DetailPage {
    api: Rc<dyn ConversationApi>,
    notifier: Rc<dyn Notifier>,
    confirmer: Rc<dyn Confirmer>,
    sleeper: Rc<dyn Sleeper>,
    navigator: Rc<dyn Navigator>,
    config: ClientConfig,
}

impl DetailPage {
    pub fn new(
        api: Rc<dyn ConversationApi>,
        notifier: Rc<dyn Notifier>,
        confirmer: Rc<dyn Confirmer>,
        sleeper: Rc<dyn Sleeper>,
        navigator: Rc<dyn Navigator>,
        config: ClientConfig,
    ) -> Self {
        Self {
            api,
            notifier,
            confirmer,
            sleeper,
            navigator,
            config,
        }
    }

    fn notify_success(&self, message: impl Into<String>) {
        self.notifier
            .show(Notice::success(message, self.config.detail_alert_dismiss()));
    }

    fn notify_error(&self, message: impl Into<String>) {
        self.notifier
            .show(Notice::error(message, self.config.detail_alert_dismiss()));
    }

    pub async fn delete_conversation(&self, conversation_id: &str) -> ActionOutcome {
        if conversation_id.is_empty() {
            tracing::warn!(
                operation = LogOperation::ConversationDelete.as_str(),
                "Delete button has no conversation id"
            );
            return ActionOutcome::Ignored;
        }
        if !self.confirmer.confirm(DELETE_PROMPT) {
            return ActionOutcome::Cancelled;
        }

        let result = with_rejection_body(self.api.delete_conversation(conversation_id).await);
        match result {
            Ok(response) if response.success => {
                logging::log_action_success(LogOperation::ConversationDelete, Some(conversation_id));
                self.notify_success("Conversation deleted successfully!");
                self.sleeper.sleep(self.config.detail_redirect()).await;
                self.navigator.navigate(&self.config.conversations_route);
                ActionOutcome::Completed
            }
            Ok(response) => {
                let error = response.error_text().to_string();
                self.notify_error(format!("Error deleting conversation: {}", error));
                ActionOutcome::Rejected(error)
            }
            Err(e) => {
                logging::log_action_error(
                    LogOperation::ConversationDelete,
                    Some(conversation_id),
                    &e.to_string(),
                );
                self.notify_error("Error deleting conversation");
                ActionOutcome::Failed
            }
        }
    }

    pub async fn clear_messages(&self, conversation_id: &str) -> ActionOutcome {
        if conversation_id.is_empty() {
            tracing::warn!(
                operation = LogOperation::MessagesClear.as_str(),
                "Clear button has no conversation id"
            );
            return ActionOutcome::Ignored;
        }
        if !self.confirmer.confirm(CLEAR_PROMPT) {
            return ActionOutcome::Cancelled;
        }

        let result = with_rejection_body(self.api.clear_messages(conversation_id).await);
        match result {
            Ok(response) if response.success => {
                logging::log_action_success(LogOperation::MessagesClear, Some(conversation_id));
                self.notify_success("Messages cleared successfully!");
                self.sleeper.sleep(self.config.detail_redirect()).await;
                self.navigator.reload();
                ActionOutcome::Completed
            }
            Ok(response) => {
                let error = response.error_text().to_string();
                self.notify_error(format!("Error clearing messages: {}", error));
                ActionOutcome::Rejected(error)
            }
            Err(e) => {
                logging::log_action_error(
                    LogOperation::MessagesClear,
                    Some(conversation_id),
                    &e.to_string(),
                );
                self.notify_error("Error clearing messages");
                ActionOutcome::Failed
            }
        }
    }
}
