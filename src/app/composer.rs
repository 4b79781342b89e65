//! Chat composer: input box, send button, reply round trip

use std::rc::Rc;

use crate::app::transcript::SharedTranscript;
use crate::domain::models::{ChatReply, ChatRequest, Sender};
use crate::shared::logging;
use crate::shared::traits::ChatApi;

/// Shown in place of the placeholder when the reply cannot be obtained
pub const APOLOGY_TEXT: &str = "Sorry, I encountered an error. Please try again.";

/// The message textarea (`#chatText`)
pub trait ComposerInput {
    fn value(&self) -> String;
    fn clear(&self);
    /// Back to the single-line height
    fn reset_height(&self);
    /// Grow to the content's scroll height
    fn fit_to_content(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing sent
    Empty,
    Replied,
    Failed,
}

pub struct Composer {
    input: Rc<dyn ComposerInput>,
    transcript: SharedTranscript,
    api: Rc<dyn ChatApi>,
}

impl Composer {
    pub fn new(
        input: Rc<dyn ComposerInput>,
        transcript: SharedTranscript,
        api: Rc<dyn ChatApi>,
    ) -> Self {
        Self {
            input,
            transcript,
            api,
        }
    }

    /// Enter sends, Shift+Enter inserts a newline
    pub fn is_submit_key(key: &str, shift: bool) -> bool {
        key == "Enter" && !shift
    }

    pub fn on_input(&self) {
        self.input.fit_to_content();
    }

    /// Send the current input.
    ///
    /// The user message is on screen and persisted before the request
    /// starts. Concurrent submissions are allowed; each one owns its
    /// placeholder and settles it in completion order.
    pub async fn submit(&self) -> SubmitOutcome {
        let text = self.input.value().trim().to_string();
        if text.is_empty() {
            return SubmitOutcome::Empty;
        }

        self.transcript.borrow_mut().append(text.clone(), Sender::User);
        self.input.clear();
        self.input.reset_height();

        let pending = self.transcript.borrow_mut().begin_pending();

        let result = self.api.send_message(&ChatRequest::new(text)).await;

        let mut transcript = self.transcript.borrow_mut();
        match result {
            Ok(ChatReply {
                reply: Some(reply), ..
            }) => {
                transcript.resolve_pending(pending, &reply);
                SubmitOutcome::Replied
            }
            Ok(ChatReply { error, .. }) => {
                let text = error.filter(|e| !e.is_empty());
                logging::log_chat_error(text.as_deref().unwrap_or("reply missing"));
                transcript.fail_pending(pending, text.as_deref().unwrap_or(APOLOGY_TEXT));
                SubmitOutcome::Failed
            }
            Err(e) => {
                logging::log_chat_error(&e.to_string());
                transcript.fail_pending(pending, APOLOGY_TEXT);
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{FakeInput, FixedClock, RecordingTranscriptView, ScriptedChatApi};
    use crate::app::transcript::{Transcript, TYPING_TEXT};
    use crate::domain::models::ChatMessage;
    use crate::shared::errors::ClientError;
    use crate::shared::storage::InMemoryStorage;
    use crate::shared::traits::KeyValueStore;

    struct Harness {
        composer: Composer,
        input: Rc<FakeInput>,
        api: Rc<ScriptedChatApi>,
        view: Rc<RecordingTranscriptView>,
        storage: Rc<InMemoryStorage>,
        transcript: SharedTranscript,
    }

    fn harness() -> Harness {
        let input = Rc::new(FakeInput::default());
        let api = Rc::new(ScriptedChatApi::default());
        let view = Rc::new(RecordingTranscriptView::default());
        let storage = Rc::new(InMemoryStorage::new());
        let transcript = Transcript::new(
            storage.clone(),
            view.clone(),
            Rc::new(FixedClock("08:30 PM")),
            "chatMessages",
        )
        .into_shared();
        let composer = Composer::new(input.clone(), transcript.clone(), api.clone());
        Harness {
            composer,
            input,
            api,
            view,
            storage,
            transcript,
        }
    }

    #[test]
    fn test_submit_key() {
        assert!(Composer::is_submit_key("Enter", false));
        assert!(!Composer::is_submit_key("Enter", true));
        assert!(!Composer::is_submit_key("a", false));
    }

    #[tokio::test]
    async fn test_blank_input_is_a_noop() {
        let h = harness();
        for blank in ["", "   ", "\n\t "] {
            h.input.type_text(blank);
            assert_eq!(h.composer.submit().await, SubmitOutcome::Empty);
        }
        assert!(h.api.requests.borrow().is_empty());
        assert_eq!(h.view.len(), 0);
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn test_user_message_shown_before_request_completes() {
        let h = harness();
        let reply = h.api.defer();
        h.input.type_text("  recommend a sci-fi film  ");

        let mut submit = Box::pin(h.composer.submit());
        assert!(futures::poll!(&mut submit).is_pending());

        assert_eq!(h.view.texts(), vec!["recommend a sci-fi film", TYPING_TEXT]);
        assert_eq!(h.input.value(), "");
        assert_eq!(h.input.height_resets.get(), 1);
        assert_eq!(*h.api.requests.borrow(), vec!["recommend a sci-fi film"]);
        let stored = h.storage.get("chatMessages").unwrap().unwrap();
        assert!(stored.contains("recommend a sci-fi film"));

        reply
            .send(Ok(ChatReply {
                reply: Some("Try Arrival (2016)".into()),
                error: None,
            }))
            .unwrap();
        assert_eq!(submit.await, SubmitOutcome::Replied);
        assert_eq!(h.view.texts(), vec!["recommend a sci-fi film", "Try Arrival (2016)"]);
        assert_eq!(
            h.transcript.borrow().messages()[1],
            ChatMessage::bot("Try Arrival (2016)", "08:30 PM")
        );
    }

    #[tokio::test]
    async fn test_network_error_marks_placeholder() {
        let h = harness();
        h.api.respond(Err(ClientError::Network("Failed to fetch".into())));
        h.input.type_text("hello");

        assert_eq!(h.composer.submit().await, SubmitOutcome::Failed);
        assert_eq!(h.view.texts(), vec!["hello", APOLOGY_TEXT]);
        assert_eq!(h.transcript.borrow().messages().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_reply_uses_server_error() {
        let h = harness();
        h.api.respond(Ok(ChatReply {
            reply: None,
            error: Some("Model unavailable".into()),
        }));
        h.input.type_text("hello");

        assert_eq!(h.composer.submit().await, SubmitOutcome::Failed);
        assert_eq!(h.view.texts(), vec!["hello", "Model unavailable"]);
    }

    #[tokio::test]
    async fn test_missing_reply_without_error_uses_apology() {
        let h = harness();
        h.api.respond(Ok(ChatReply::default()));
        h.input.type_text("hello");

        assert_eq!(h.composer.submit().await, SubmitOutcome::Failed);
        assert_eq!(h.view.texts(), vec!["hello", APOLOGY_TEXT]);
    }

    #[tokio::test]
    async fn test_double_submit_settles_independently() {
        let h = harness();
        let first = h.api.defer();
        let second = h.api.defer();

        h.input.type_text("first question");
        let mut a = Box::pin(h.composer.submit());
        assert!(futures::poll!(&mut a).is_pending());

        h.input.type_text("second question");
        let mut b = Box::pin(h.composer.submit());
        assert!(futures::poll!(&mut b).is_pending());

        assert_eq!(h.transcript.borrow().pending_count(), 2);
        assert_eq!(
            h.view.texts(),
            vec!["first question", "second question", TYPING_TEXT, TYPING_TEXT]
        );

        // Second request finishes first
        second
            .send(Ok(ChatReply {
                reply: Some("second answer".into()),
                error: None,
            }))
            .unwrap();
        assert_eq!(b.await, SubmitOutcome::Replied);
        assert_eq!(
            h.view.texts(),
            vec!["first question", "second question", "second answer", TYPING_TEXT]
        );

        first
            .send(Err(ClientError::Http {
                status: 502,
                status_text: "Bad Gateway".into(),
                body: None,
            }))
            .unwrap();
        assert_eq!(a.await, SubmitOutcome::Failed);
        assert_eq!(
            h.view.texts(),
            vec!["first question", "second question", "second answer", APOLOGY_TEXT]
        );

        let transcript = h.transcript.borrow();
        assert_eq!(transcript.messages().len(), 3);
        assert_eq!(transcript.pending_count(), 1);
    }

    #[test]
    fn test_on_input_fits_height() {
        let h = harness();
        h.composer.on_input();
        h.composer.on_input();
        assert_eq!(h.input.fits.get(), 2);
    }

    #[tokio::test]
    async fn test_dropped_request_marks_placeholder() {
        let h = harness();
        let tx = h.api.defer();
        h.input.type_text("x");
        let mut submit = Box::pin(h.composer.submit());
        assert!(futures::poll!(&mut submit).is_pending());
        drop(tx);
        assert_eq!(submit.await, SubmitOutcome::Failed);

        let transcript = h.transcript.borrow();
        assert_eq!(transcript.pending_count(), 1);
        assert!(transcript.messages().iter().all(|m| m.sender == Sender::User));
        assert_eq!(h.view.texts(), vec!["x", APOLOGY_TEXT]);
    }
}
