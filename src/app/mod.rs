// Page controllers
// Each controller is DOM-free; `web` binds them to the server-rendered markup.
pub mod composer;
pub mod detail;
pub mod history;
pub mod notifications;
pub mod transcript;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use composer::{Composer, ComposerInput, SubmitOutcome};
pub use detail::DetailPage;
pub use history::{ActionButton, ConversationList, ConversationListView, HistoryManager};
pub use notifications::{Notice, NoticeKind, Notifier};
pub use transcript::{PendingId, SharedTranscript, Transcript, TranscriptView};

/// Result of a confirmed conversation action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The user dismissed the confirmation prompt
    Cancelled,
    /// Nothing to act on (missing id, duplicate click, torn-down list)
    Ignored,
    Completed,
    /// The server answered `success: false`
    Rejected(String),
    /// Transport or decode failure
    Failed,
}
