//! Blocking confirmation dialog for destructive course actions

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::console::ui::{centered_rect, Styles};
use crate::models::{Course, ModerationAction, TagColor};
use crate::operations::ModerationPrompt;

/// What happens when the dialog is confirmed
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Moderate(ModerationAction, String),
    Delete(String),
}

/// Result of feeding a key to the dialog
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    Open,
    Confirmed(PendingAction),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub title: String,
    pub content: String,
    pub icon: (&'static str, TagColor),
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
    pub confirm_focused: bool,
    pub action: PendingAction,
}

impl ConfirmDialog {
    pub fn from_prompt(prompt: ModerationPrompt) -> Self {
        Self {
            content: format!("{}\n\n\"{}\"", prompt.content, prompt.course_name),
            title: prompt.title,
            icon: prompt.icon,
            confirm_label: prompt.confirm_label,
            cancel_label: prompt.cancel_label,
            confirm_focused: true,
            action: PendingAction::Moderate(prompt.action, prompt.course_id),
        }
    }

    pub fn for_delete(course: &Course) -> Self {
        Self {
            title: "Confirm: delete course".to_string(),
            content: format!(
                "Are you sure you want to delete this course?\n\n\"{}\"",
                course.name
            ),
            icon: ("🗑", TagColor::Red),
            confirm_label: "Delete",
            cancel_label: "Cancel",
            // Destructive default is off
            confirm_focused: false,
            action: PendingAction::Delete(course.id.clone()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.confirm_focused = !self.confirm_focused;
                DialogOutcome::Open
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => DialogOutcome::Confirmed(self.action.clone()),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => DialogOutcome::Cancelled,
            KeyCode::Enter => {
                if self.confirm_focused {
                    DialogOutcome::Confirmed(self.action.clone())
                } else {
                    DialogOutcome::Cancelled
                }
            }
            _ => DialogOutcome::Open,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 35, area);
        f.render_widget(Clear, popup_area);

        let (icon, color) = self.icon;
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(format!(" {} ", icon), Styles::tag(color)),
                Span::styled(self.title.clone(), Styles::title()),
            ]))
            .borders(Borders::ALL)
            .border_style(Styles::tag(color));

        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let content = Paragraph::new(self.content.clone())
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        f.render_widget(content, chunks[0]);

        let button = |label: &str, focused: bool| {
            let style = if focused { Styles::selected() } else { Style::default() };
            Span::styled(format!("[ {} ]", label), style)
        };
        let buttons = Paragraph::new(Line::from(vec![
            button(self.cancel_label, !self.confirm_focused),
            Span::raw("   "),
            button(self.confirm_label, self.confirm_focused),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(buttons, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseStatus;
    use crate::operations::request_moderation;
    use crate::operations::testing::course;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_moderation_dialog_confirms_on_enter() {
        let prompt =
            request_moderation(ModerationAction::Reject, &course("c1", CourseStatus::Pending)).unwrap();
        let mut dialog = ConfirmDialog::from_prompt(prompt);
        assert_eq!(dialog.confirm_label, "Reject");
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogOutcome::Confirmed(PendingAction::Moderate(ModerationAction::Reject, "c1".to_string()))
        );
    }

    #[test]
    fn test_delete_dialog_defaults_to_cancel() {
        let mut dialog = ConfirmDialog::for_delete(&course("c2", CourseStatus::Draft));
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogOutcome::Cancelled);

        dialog.handle_key(key(KeyCode::Right));
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogOutcome::Confirmed(PendingAction::Delete("c2".to_string()))
        );
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), DialogOutcome::Cancelled);
        assert_eq!(dialog.handle_key(key(KeyCode::Char('x'))), DialogOutcome::Open);
    }
}
