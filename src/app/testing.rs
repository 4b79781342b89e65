//! Recording doubles for the controller seams

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::app::history::{ActionButton, ConversationListView};
use crate::app::notifications::{Notice, Notifier};
use crate::app::composer::ComposerInput;
use crate::app::transcript::{RenderedEntry, TranscriptView};
use crate::domain::models::{ActionResponse, ChatReply, ChatRequest};
use crate::shared::errors::{ClientError, Result};
use crate::shared::traits::{ChatApi, Clock, Confirmer, ConversationApi, Navigator, Sleeper};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub class: String,
    pub text: String,
    pub time: Option<String>,
}

#[derive(Default)]
pub struct RecordingTranscriptView {
    pub nodes: RefCell<Vec<Node>>,
    pub renders: Cell<usize>,
    pub scrolls: Cell<usize>,
}

impl RecordingTranscriptView {
    pub fn texts(&self) -> Vec<String> {
        self.nodes.borrow().iter().map(|n| n.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }
}

impl TranscriptView for RecordingTranscriptView {
    fn clear(&self) {
        self.renders.set(self.renders.get() + 1);
        self.nodes.borrow_mut().clear();
    }

    fn append(&self, entry: &RenderedEntry<'_>) {
        self.nodes.borrow_mut().push(Node {
            class: entry.class.clone(),
            text: entry.text.to_string(),
            time: entry.time.map(str::to_string),
        });
    }

    fn scroll_to_bottom(&self) {
        self.scrolls.set(self.scrolls.get() + 1);
    }
}

pub struct FixedClock(pub &'static str);

impl Clock for FixedClock {
    fn now_label(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Default)]
pub struct FakeInput {
    pub value: RefCell<String>,
    pub height_resets: Cell<usize>,
    pub fits: Cell<usize>,
}

impl FakeInput {
    pub fn type_text(&self, text: &str) {
        *self.value.borrow_mut() = text.to_string();
    }
}

impl ComposerInput for FakeInput {
    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn clear(&self) {
        self.value.borrow_mut().clear();
    }

    fn reset_height(&self) {
        self.height_resets.set(self.height_resets.get() + 1);
    }

    fn fit_to_content(&self) {
        self.fits.set(self.fits.get() + 1);
    }
}

enum Scripted<T> {
    Ready(Result<T>),
    Deferred(oneshot::Receiver<Result<T>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T> {
        match self {
            Scripted::Ready(result) => result,
            Scripted::Deferred(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ClientError::Network("request dropped".into()))),
        }
    }
}

/// Reply endpoint answering from a queue, in call order
#[derive(Default)]
pub struct ScriptedChatApi {
    script: RefCell<VecDeque<Scripted<ChatReply>>>,
    pub requests: RefCell<Vec<String>>,
}

impl ScriptedChatApi {
    pub fn respond(&self, result: Result<ChatReply>) {
        self.script.borrow_mut().push_back(Scripted::Ready(result));
    }

    /// Queue a reply that resolves when the returned sender fires
    pub fn defer(&self) -> oneshot::Sender<Result<ChatReply>> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().push_back(Scripted::Deferred(rx));
        tx
    }
}

#[async_trait(?Send)]
impl ChatApi for ScriptedChatApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.requests.borrow_mut().push(request.message.clone());
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(step) => step.resolve().await,
            None => Err(ClientError::Network("no scripted reply".into())),
        }
    }
}

#[derive(Default)]
pub struct ScriptedConversationApi {
    script: RefCell<VecDeque<Scripted<ActionResponse>>>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedConversationApi {
    pub fn respond(&self, result: Result<ActionResponse>) {
        self.script.borrow_mut().push_back(Scripted::Ready(result));
    }

    pub fn succeed(&self) {
        self.respond(Ok(ActionResponse {
            success: true,
            ..Default::default()
        }));
    }

    pub fn reject(&self, error: &str) {
        self.respond(Ok(ActionResponse {
            success: false,
            error: Some(error.to_string()),
            deleted_count: None,
        }));
    }

    pub fn defer(&self) -> oneshot::Sender<Result<ActionResponse>> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().push_back(Scripted::Deferred(rx));
        tx
    }

    async fn next(&self, call: String) -> Result<ActionResponse> {
        self.calls.borrow_mut().push(call);
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(step) => step.resolve().await,
            None => Err(ClientError::Network("no scripted response".into())),
        }
    }
}

#[async_trait(?Send)]
impl ConversationApi for ScriptedConversationApi {
    async fn delete_conversation(&self, conversation_id: &str) -> Result<ActionResponse> {
        self.next(format!("DELETE /delete_conversation/{}", conversation_id))
            .await
    }

    async fn clear_chats(&self) -> Result<ActionResponse> {
        self.next("POST /clear_chats".to_string()).await
    }

    async fn clear_messages(&self, conversation_id: &str) -> Result<ActionResponse> {
        self.next(format!("POST /clear_messages/{}", conversation_id))
            .await
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.notices.borrow().iter().map(|n| n.message.clone()).collect()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

pub struct FixedConfirmer {
    pub answer: Cell<bool>,
    pub prompts: RefCell<Vec<String>>,
}

impl FixedConfirmer {
    pub fn accepting() -> Self {
        Self {
            answer: Cell::new(true),
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl Confirmer for FixedConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.answer.get()
    }
}

/// Returns immediately, remembering what was asked for
#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: RefCell<Vec<Duration>>,
}

#[async_trait(?Send)]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub reloads: Cell<usize>,
    pub navigations: RefCell<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn navigate(&self, path: &str) {
        self.navigations.borrow_mut().push(path.to_string());
    }
}

pub struct FakeButton {
    pub label: RefCell<String>,
    pub disabled: Cell<bool>,
}

impl FakeButton {
    pub fn new(label: &str) -> Self {
        Self {
            label: RefCell::new(label.to_string()),
            disabled: Cell::new(false),
        }
    }
}

impl ActionButton for FakeButton {
    fn label(&self) -> String {
        self.label.borrow().clone()
    }

    fn set_label(&self, label: &str) {
        *self.label.borrow_mut() = label.to_string();
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }
}

#[derive(Default)]
pub struct FakeListView {
    pub items: RefCell<Vec<String>>,
    pub collapsed: RefCell<Vec<String>>,
}

impl FakeListView {
    pub fn with_items(ids: &[&str]) -> Self {
        Self {
            items: RefCell::new(ids.iter().map(|id| id.to_string()).collect()),
            collapsed: RefCell::new(Vec::new()),
        }
    }
}

impl ConversationListView for FakeListView {
    fn collapse_item(&self, conversation_id: &str) {
        self.collapsed.borrow_mut().push(conversation_id.to_string());
    }

    fn remove_item(&self, conversation_id: &str) -> bool {
        let mut items = self.items.borrow_mut();
        let before = items.len();
        items.retain(|id| id != conversation_id);
        items.len() != before
    }

    fn item_count(&self) -> usize {
        self.items.borrow().len()
    }
}
