//! Transient user-facing notifications (the toast of a GUI).

use std::fmt::Write as _;

use crate::error::UsersError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    /// Title used when the server sent no message.
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Success => "Success!",
            Self::Warning => "Attention.",
            Self::Error => "Error!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    /// Build a notification, falling back to the kind's default title when
    /// `message` is absent or blank.
    pub fn new(kind: NotificationKind, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| kind.default_title().to_owned());
        Self { kind, message }
    }

    pub fn success(message: Option<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    /// Local validation problems are warnings; everything else is an error.
    pub fn from_error(err: &UsersError) -> Self {
        let kind = if err.is_local() {
            NotificationKind::Warning
        } else {
            NotificationKind::Error
        };

        let mut message = err.to_string();
        for field in err.field_errors() {
            let _ = write!(message, "\n  - {field}");
        }
        Self::new(kind, Some(message))
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}
