//! Chat transcript store mirrored into local storage
//!
//! Owns the ordered message sequence and the reply placeholders still on
//! screen. Every mutation persists the whole sequence and redraws the
//! container from scratch; placeholders are drawn after the messages and are
//! never written to storage.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::models::{ChatMessage, Sender};
use crate::shared::errors::Result;
use crate::shared::logging;
use crate::shared::traits::{Clock, KeyValueStore};

/// Placeholder text while a reply is outstanding
pub const TYPING_TEXT: &str = "Typing...";

pub type SharedTranscript = Rc<RefCell<Transcript>>;

/// One node as handed to the view
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEntry<'a> {
    pub class: String,
    pub text: &'a str,
    /// Placeholders carry no time
    pub time: Option<&'a str>,
}

/// The transcript container (`#chatMessages`)
pub trait TranscriptView {
    fn clear(&self);
    /// Text must be inserted as text, never parsed as markup
    fn append(&self, entry: &RenderedEntry<'_>);
    fn scroll_to_bottom(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingState {
    Waiting,
    Failed(String),
}

#[derive(Debug)]
struct PendingReply {
    id: PendingId,
    state: PendingState,
}

impl PendingReply {
    fn text(&self) -> &str {
        match &self.state {
            PendingState::Waiting => TYPING_TEXT,
            PendingState::Failed(text) => text,
        }
    }
}

pub struct Transcript {
    storage: Rc<dyn KeyValueStore>,
    view: Rc<dyn TranscriptView>,
    clock: Rc<dyn Clock>,
    key: String,
    messages: Vec<ChatMessage>,
    pending: Vec<PendingReply>,
    next_pending: u64,
}

impl Transcript {
    pub fn new(
        storage: Rc<dyn KeyValueStore>,
        view: Rc<dyn TranscriptView>,
        clock: Rc<dyn Clock>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            view,
            clock,
            key: key.into(),
            messages: Vec::new(),
            pending: Vec::new(),
            next_pending: 0,
        }
    }

    pub fn into_shared(self) -> SharedTranscript {
        Rc::new(RefCell::new(self))
    }

    /// Restore the persisted sequence and redraw.
    ///
    /// A missing key leaves the container untouched. Unreadable or corrupt
    /// data is logged and replaced by an empty sequence. Returns the number
    /// of restored messages.
    pub fn load(&mut self) -> usize {
        let raw = match self.storage.get(&self.key) {
            Ok(raw) => raw,
            Err(e) => {
                logging::log_transcript_corrupt(&self.key, &e.to_string());
                None
            }
        };

        let Some(raw) = raw else {
            self.messages.clear();
            self.view.scroll_to_bottom();
            return 0;
        };

        match serde_json::from_str::<Vec<ChatMessage>>(&raw) {
            Ok(messages) => {
                self.messages = messages;
                logging::log_transcript_loaded(&self.key, self.messages.len());
            }
            Err(e) => {
                logging::log_transcript_corrupt(&self.key, &e.to_string());
                self.messages.clear();
            }
        }

        self.render();
        self.messages.len()
    }

    /// Add a message stamped with the current time, persist, redraw
    pub fn append(&mut self, text: impl Into<String>, sender: Sender) -> &ChatMessage {
        let message = ChatMessage::new(text, sender, self.clock.now_label());
        self.messages.push(message);
        self.persist();
        self.render();
        &self.messages[self.messages.len() - 1]
    }

    /// Full redraw: messages in order, then open placeholders
    pub fn render(&self) {
        self.view.clear();

        for message in &self.messages {
            self.view.append(&RenderedEntry {
                class: message.sender.css_class(),
                text: &message.text,
                time: Some(&message.time),
            });
        }

        for pending in &self.pending {
            self.view.append(&RenderedEntry {
                class: Sender::Bot.css_class(),
                text: pending.text(),
                time: None,
            });
        }

        self.view.scroll_to_bottom();
    }

    /// Write the whole sequence again (page teardown)
    pub fn flush(&self) -> Result<()> {
        let encoded = serde_json::to_string(&self.messages)?;
        self.storage.set(&self.key, &encoded)
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            logging::log_transcript_persist_error(&self.key, &e.to_string());
        }
    }

    /// Show a "Typing..." placeholder below the transcript
    pub fn begin_pending(&mut self) -> PendingId {
        let id = PendingId(self.next_pending);
        self.next_pending += 1;
        self.pending.push(PendingReply {
            id,
            state: PendingState::Waiting,
        });
        self.render();
        id
    }

    /// Drop the placeholder and append the bot reply in its place
    pub fn resolve_pending(&mut self, id: PendingId, reply: &str) {
        self.pending.retain(|p| p.id != id);
        self.append(reply, Sender::Bot);
    }

    /// Keep the placeholder on screen with an error text
    pub fn fail_pending(&mut self, id: PendingId, text: &str) {
        if let Some(pending) = self.pending.iter_mut().find(|p| p.id == id) {
            pending.state = PendingState::Failed(text.to_string());
        }
        self.render();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }
}
