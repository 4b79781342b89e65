//! Transient banner notifications

use std::time::Duration;

/// Inline style of every banner (top-right, above page content)
pub const BANNER_STYLE: &str =
    "position: fixed; top: 20px; right: 20px; z-index: 9999; min-width: 300px;";

/// Marker class of banners that replace each other
pub const EXCLUSIVE_CLASS: &str = "custom-alert";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// Bootstrap alert variant
    pub fn variant(&self) -> &'static str {
        match self {
            NoticeKind::Success => "alert-success",
            NoticeKind::Error => "alert-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub dismiss_after: Duration,
    /// Remove earlier exclusive banners before showing this one
    pub exclusive: bool,
}

impl Notice {
    pub fn success(message: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            dismiss_after,
            exclusive: false,
        }
    }

    pub fn error(message: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            dismiss_after,
            exclusive: false,
        }
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn class_name(&self) -> String {
        let base = format!("alert {} alert-dismissible fade show", self.kind.variant());
        if self.exclusive {
            format!("{} {}", EXCLUSIVE_CLASS, base)
        } else {
            base
        }
    }
}

/// Something that can put a banner on screen
pub trait Notifier {
    fn show(&self, notice: Notice);
}
