//! Operations behind the console's screens and the CLI
//!
//! Each operation issues at most one request, never retries, and reports
//! its outcome as a `Notification` for the caller to display.

pub mod course_actions;
pub mod user_registration;

pub use course_actions::{delete_course, moderate_course, request_moderation, ModerationPrompt};
pub use user_registration::{register_user, submit_user_form};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message shown to the admin after an operation
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}
