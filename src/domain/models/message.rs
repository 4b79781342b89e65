use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Who wrote a transcript entry. Doubles as the CSS modifier class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    /// Class list for a rendered transcript node
    pub fn css_class(&self) -> String {
        format!("message {}", self.as_str())
    }
}

/// One persisted chat message.
///
/// The serialized shape is exactly `{text, sender, time}`; the sequence is
/// stored as a JSON array in local storage and read back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub time: String,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender, time: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
            time: time.into(),
        }
    }

    pub fn user(text: impl Into<String>, time: impl Into<String>) -> Self {
        Self::new(text, Sender::User, time)
    }

    pub fn bot(text: impl Into<String>, time: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot, time)
    }
}

/// Two-digit hour and minute, 12-hour clock ("02:07 PM")
pub fn format_time<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%I:%M %p").to_string()
}
