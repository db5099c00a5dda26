//! Status display component for notifications and progress

use std::time::Duration;

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::console::ui::Styles;
use crate::operations::{Notification, NotificationKind};

/// Types of status messages
#[derive(Debug, Clone, PartialEq)]
pub enum StatusType {
    Info,
    Success,
    Error,
    Loading,
}

/// Status message with type and content
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: chrono::Local::now(),
        }
    }
}

impl From<Notification> for StatusMessage {
    fn from(notification: Notification) -> Self {
        let status_type = match notification.kind {
            NotificationKind::Success => StatusType::Success,
            NotificationKind::Error => StatusType::Error,
        };
        Self::new(notification.message, status_type)
    }
}

/// Notification bar. Success and info messages clear themselves after a
/// timeout; errors and loading messages stay until replaced.
#[derive(Default)]
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub auto_clear_timeout: Option<Duration>,
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_clear(mut self, timeout: Duration) -> Self {
        self.auto_clear_timeout = Some(timeout);
        self
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.current_message = Some(message);
    }

    pub fn notify(&mut self, notification: Notification) {
        self.set_message(notification.into());
    }

    pub fn set_info(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Info));
    }

    pub fn set_error(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Error));
    }

    pub fn set_loading(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Loading));
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    /// Check if we should auto-clear the current message
    pub fn should_auto_clear(&self) -> bool {
        if let (Some(timeout), Some(message)) = (self.auto_clear_timeout, &self.current_message) {
            if matches!(message.status_type, StatusType::Info | StatusType::Success) {
                let elapsed = chrono::Local::now().signed_duration_since(message.timestamp);
                return elapsed.to_std().unwrap_or_default() > timeout;
            }
        }
        false
    }

    /// Render the status display
    pub fn render(&self, f: &mut Frame, area: Rect, idle_text: &str) {
        let (content, style) = match &self.current_message {
            Some(message) => {
                let style = match message.status_type {
                    StatusType::Info => Styles::info(),
                    StatusType::Success => Styles::success(),
                    StatusType::Error => Styles::error(),
                    StatusType::Loading => Styles::warning(),
                };
                (Self::format_message(message), style)
            }
            None => (idle_text.to_string(), Styles::inactive()),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let paragraph = Paragraph::new(content)
            .style(style)
            .block(block);

        f.render_widget(paragraph, area);
    }

    fn format_message(message: &StatusMessage) -> String {
        let prefix = match message.status_type {
            StatusType::Info => "ℹ",
            StatusType::Success => "✓",
            StatusType::Error => "✗",
            StatusType::Loading => "⟳",
        };

        format!(
            "{} [{}] {}",
            prefix,
            message.timestamp.format("%H:%M:%S"),
            message.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_conversion() {
        let message: StatusMessage = Notification::error("boom").into();
        assert_eq!(message.status_type, StatusType::Error);
        assert_eq!(message.message, "boom");
    }

    #[test]
    fn test_errors_are_not_auto_cleared() {
        let mut display = StatusDisplay::new().with_auto_clear(Duration::from_millis(0));
        display.set_error("failed".to_string());
        display.current_message.as_mut().unwrap().timestamp =
            chrono::Local::now() - chrono::Duration::seconds(10);
        assert!(!display.should_auto_clear());

        display.notify(Notification::success("done"));
        display.current_message.as_mut().unwrap().timestamp =
            chrono::Local::now() - chrono::Duration::seconds(10);
        assert!(display.should_auto_clear());
    }
}
