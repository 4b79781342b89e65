//! Conversation history page: per-item delete and clear-all
//!
//! Clicks reach [`HistoryManager`] through one delegated listener. The
//! [`ConversationList`] keeps track of which items have a live handler and
//! which deletions are still in flight, so a double click on the same item
//! sends a single request and a torn-down page stops reacting.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::app::notifications::{Notice, Notifier};
use crate::app::ActionOutcome;
use crate::config::ClientConfig;
use crate::shared::logging::{self, LogOperation};
use crate::shared::traits::{Confirmer, ConversationApi, Navigator, Sleeper};

pub const DELETE_ONE_PROMPT: &str = "Are you sure you want to delete this conversation?";
pub const DELETE_ALL_PROMPT: &str = "Are you sure you want to delete ALL your chat history?";
pub const DELETING_LABEL: &str = "⏳ Deleting...";
pub const CLEARING_LABEL: &str = "⏳ Clearing all chats...";
pub const NETWORK_ERROR_TEXT: &str = "❌ Network error. Please try again.";

/// A button that shows progress while its request runs
pub trait ActionButton {
    fn label(&self) -> String;
    fn set_label(&self, label: &str);
    fn set_disabled(&self, disabled: bool);
}

/// The rendered conversation list
pub trait ConversationListView {
    /// Start the collapse transition of the item holding this conversation
    fn collapse_item(&self, conversation_id: &str);
    /// Remove the item node; false when the button sits outside any item
    fn remove_item(&self, conversation_id: &str) -> bool;
    /// Number of `.conversation-item` nodes still in the document
    fn item_count(&self) -> usize;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ItemBinding {
    in_flight: bool,
}

/// Bound item handlers of the list page
#[derive(Debug, Default)]
pub struct ConversationList {
    items: RefCell<BTreeMap<String, ItemBinding>>,
    torn_down: Cell<bool>,
}

impl ConversationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, conversation_id: &str) {
        if self.torn_down.get() {
            return;
        }
        self.items
            .borrow_mut()
            .entry(conversation_id.to_string())
            .or_default();
    }

    pub fn unbind(&self, conversation_id: &str) {
        self.items.borrow_mut().remove(conversation_id);
    }

    pub fn is_bound(&self, conversation_id: &str) -> bool {
        self.items.borrow().contains_key(conversation_id)
    }

    pub fn bound_count(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_in_flight(&self, conversation_id: &str) -> bool {
        self.items
            .borrow()
            .get(conversation_id)
            .is_some_and(|b| b.in_flight)
    }

    /// Claim the item for a delete request. Items created after page load
    /// are bound on first use. Fails if a request is already running for it
    /// or the list has been torn down.
    pub fn begin_delete(&self, conversation_id: &str) -> bool {
        if self.torn_down.get() {
            return false;
        }
        let mut items = self.items.borrow_mut();
        let binding = items.entry(conversation_id.to_string()).or_default();
        if binding.in_flight {
            return false;
        }
        binding.in_flight = true;
        true
    }

    pub fn end_delete(&self, conversation_id: &str) {
        if let Some(binding) = self.items.borrow_mut().get_mut(conversation_id) {
            binding.in_flight = false;
        }
    }

    /// Drop every handler; later clicks are ignored. Returns how many were bound.
    pub fn teardown(&self) -> usize {
        self.torn_down.set(true);
        let mut items = self.items.borrow_mut();
        let count = items.len();
        items.clear();
        count
    }

    /// `pagehide`: a page kept in the back/forward cache (`persisted`) comes
    /// back with its bindings. Any other exit tears the list down and
    /// returns how many items were released.
    pub fn page_hidden(&self, persisted: bool) -> Option<usize> {
        if persisted {
            return None;
        }
        Some(self.teardown())
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }
}

pub struct HistoryManager {
    api: Rc<dyn ConversationApi>,
    view: Rc<dyn ConversationListView>,
    notifier: Rc<dyn Notifier>,
    confirmer: Rc<dyn Confirmer>,
    sleeper: Rc<dyn Sleeper>,
    navigator: Rc<dyn Navigator>,
    list: ConversationList,
    config: ClientConfig,
}

impl HistoryManager {
    pub fn new(
        api: Rc<dyn ConversationApi>,
        view: Rc<dyn ConversationListView>,
        notifier: Rc<dyn Notifier>,
        confirmer: Rc<dyn Confirmer>,
        sleeper: Rc<dyn Sleeper>,
        navigator: Rc<dyn Navigator>,
        config: ClientConfig,
    ) -> Self {
        Self {
            api,
            view,
            notifier,
            confirmer,
            sleeper,
            navigator,
            list: ConversationList::new(),
            config,
        }
    }

    pub fn list(&self) -> &ConversationList {
        &self.list
    }

    fn notify_success(&self, message: impl Into<String>) {
        self.notifier
            .show(Notice::success(message, self.config.alert_dismiss()).exclusive());
    }

    fn notify_error(&self, message: impl Into<String>) {
        self.notifier
            .show(Notice::error(message, self.config.alert_dismiss()).exclusive());
    }

    /// Delete one conversation from the list
    pub async fn delete_one(&self, conversation_id: &str, button: &dyn ActionButton) -> ActionOutcome {
        if conversation_id.is_empty() || self.list.is_torn_down() {
            return ActionOutcome::Ignored;
        }
        if self.list.is_in_flight(conversation_id) {
            return ActionOutcome::Ignored;
        }
        if !self.confirmer.confirm(DELETE_ONE_PROMPT) {
            return ActionOutcome::Cancelled;
        }
        if !self.list.begin_delete(conversation_id) {
            return ActionOutcome::Ignored;
        }

        let original_label = button.label();
        button.set_label(DELETING_LABEL);
        button.set_disabled(true);

        let result = self.api.delete_conversation(conversation_id).await;

        match result {
            Ok(response) if response.success => {
                logging::log_action_success(LogOperation::ConversationDelete, Some(conversation_id));
                self.notify_success("✅ Conversation deleted successfully!");

                self.view.collapse_item(conversation_id);
                self.sleeper.sleep(self.config.item_collapse()).await;
                let removed = self.view.remove_item(conversation_id);
                self.list.unbind(conversation_id);

                if removed && self.view.item_count() == 0 {
                    self.navigator.reload();
                }
                ActionOutcome::Completed
            }
            Ok(response) => {
                let error = response.error_text().to_string();
                button.set_label(&original_label);
                button.set_disabled(false);
                self.list.end_delete(conversation_id);
                self.notify_error(format!("❌ Error: {}", error));
                ActionOutcome::Rejected(error)
            }
            Err(e) => {
                logging::log_action_error(
                    LogOperation::ConversationDelete,
                    Some(conversation_id),
                    &e.to_string(),
                );
                button.set_label(&original_label);
                button.set_disabled(false);
                self.list.end_delete(conversation_id);
                self.notify_error(NETWORK_ERROR_TEXT);
                ActionOutcome::Failed
            }
        }
    }

    /// Delete every conversation, then reload
    pub async fn delete_all(&self, button: &dyn ActionButton) -> ActionOutcome {
        if !self.confirmer.confirm(DELETE_ALL_PROMPT) {
            return ActionOutcome::Cancelled;
        }

        let original_label = button.label();
        button.set_label(CLEARING_LABEL);
        button.set_disabled(true);

        match self.api.clear_chats().await {
            Ok(response) if response.success => {
                logging::log_action_success(LogOperation::ChatsClear, None);
                let count = response
                    .deleted_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "all".to_string());
                self.notify_success(format!("✅ Cleared {} conversations!", count));

                self.sleeper.sleep(self.config.clear_all_reload()).await;
                self.navigator.reload();
                ActionOutcome::Completed
            }
            Ok(response) => {
                let error = response.error_text().to_string();
                self.notify_error(format!("❌ Error: {}", error));
                button.set_label(&original_label);
                button.set_disabled(false);
                ActionOutcome::Rejected(error)
            }
            Err(e) => {
                logging::log_action_error(LogOperation::ChatsClear, None, &e.to_string());
                button.set_label(&original_label);
                button.set_disabled(false);
                self.notify_error(NETWORK_ERROR_TEXT);
                ActionOutcome::Failed
            }
        }
    }
}
