//! Structured logging for the CineChat page controllers
//!
//! Provides consistent, contextual logging across the controllers.
//! Every event carries an `operation` field so console output can be filtered.

/// Operation tags attached to log events
#[derive(Debug, Clone, Copy)]
pub enum LogOperation {
    TranscriptLoad,
    TranscriptPersist,
    ChatRequest,
    ConversationDelete,
    ChatsClear,
    MessagesClear,
    Notification,
    PageSetup,
}

impl LogOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogOperation::TranscriptLoad => "transcript_load",
            LogOperation::TranscriptPersist => "transcript_persist",
            LogOperation::ChatRequest => "chat_request",
            LogOperation::ConversationDelete => "conversation_delete",
            LogOperation::ChatsClear => "chats_clear",
            LogOperation::MessagesClear => "messages_clear",
            LogOperation::Notification => "notification",
            LogOperation::PageSetup => "page_setup",
        }
    }
}

/// Install the global subscriber.
///
/// Native builds read `RUST_LOG` (default INFO). In the browser, output goes
/// to the devtools console without timestamps or colours.
pub fn init() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::INFO.into()),
            )
            .try_init();
    }

    #[cfg(target_arch = "wasm32")]
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
            .with_writer(console::ConsoleMakeWriter)
            .without_time()
            .with_ansi(false)
            .with_target(false)
            .try_init();
    }
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;
    use tracing_subscriber::fmt::MakeWriter;

    /// Buffers one formatted event and hands it to `console.log` on drop
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim_end();
            if !line.is_empty() {
                web_sys::console::log_1(&line.into());
            }
        }
    }

    pub struct ConsoleMakeWriter;

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter { buf: Vec::new() }
        }
    }
}

/// Log the outcome of reading the persisted transcript
pub fn log_transcript_loaded(key: &str, message_count: usize) {
    tracing::info!(
        operation = LogOperation::TranscriptLoad.as_str(),
        storage_key = key,
        message_count = message_count,
        "Transcript restored from local storage"
    );
}

/// Log a corrupt persisted transcript (the value is discarded)
pub fn log_transcript_corrupt(key: &str, error: &str) {
    tracing::error!(
        operation = LogOperation::TranscriptLoad.as_str(),
        storage_key = key,
        error = error,
        "Error loading chat messages"
    );
}

/// Log a failed write of the transcript
pub fn log_transcript_persist_error(key: &str, error: &str) {
    tracing::warn!(
        operation = LogOperation::TranscriptPersist.as_str(),
        storage_key = key,
        error = error,
        "Failed to persist chat messages"
    );
}

/// Log a failed chat round trip
pub fn log_chat_error(error: &str) {
    tracing::error!(
        operation = LogOperation::ChatRequest.as_str(),
        error = error,
        "Chat request failed"
    );
}

/// Log a failed conversation management call
pub fn log_action_error(operation: LogOperation, conversation_id: Option<&str>, error: &str) {
    tracing::error!(
        operation = operation.as_str(),
        conversation_id = conversation_id.unwrap_or("-"),
        error = error,
        "Fetch error"
    );
}

/// Log a completed conversation management call
pub fn log_action_success(operation: LogOperation, conversation_id: Option<&str>) {
    tracing::info!(
        operation = operation.as_str(),
        conversation_id = conversation_id.unwrap_or("-"),
        "Action completed"
    );
}
