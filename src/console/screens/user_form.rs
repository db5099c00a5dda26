//! User creation form screen

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::console::{
    app::Screen,
    components::{Form, FormField, FormFieldType},
    traits::{FormHandler, ScreenAction},
    ui::Styles,
};
use crate::models::{Role, UserRegistrationRequest};
use crate::operations::Notification;
use crate::validation::{self, UserField, UserFormValues};

/// editing → submitting → editing (reset on success, kept on failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
}

pub struct UserFormScreen {
    pub form: Form,
    pub phase: FormPhase,
}

impl Default for UserFormScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl UserFormScreen {
    pub fn new() -> Self {
        let fields = UserField::ALL
            .iter()
            .map(|&field| {
                let field_type = match field {
                    UserField::Password => FormFieldType::Password,
                    UserField::Role => FormFieldType::Dropdown,
                    _ => FormFieldType::Text,
                };
                let form_field =
                    FormField::new(field.label(), field_type).with_placeholder(field.placeholder());
                if field == UserField::Role {
                    form_field.with_dropdown_options(
                        Role::ALL.iter().map(|r| r.label().to_string()).collect(),
                    )
                } else {
                    form_field
                }
            })
            .collect();

        Self {
            form: Form::new(fields),
            phase: FormPhase::Editing,
        }
    }

    fn field_index(field: UserField) -> usize {
        UserField::ALL
            .iter()
            .position(|&f| f == field)
            .unwrap_or_default()
    }

    pub fn field(&self, field: UserField) -> Option<&FormField> {
        self.form.get_field(Self::field_index(field))
    }

    /// Current values as typed
    pub fn values(&self) -> UserFormValues {
        let text = |field: UserField| {
            self.field(field)
                .map(|f| f.value.clone())
                .unwrap_or_default()
        };
        UserFormValues {
            name: text(UserField::Name),
            email: text(UserField::Email),
            phone: text(UserField::Phone),
            password: text(UserField::Password),
            role: Role::from_label(&text(UserField::Role)),
        }
    }

    /// Run every rule, marking failing fields inline.
    ///
    /// Returns the request and enters `Submitting` only when all rules pass
    /// and no submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<UserRegistrationRequest> {
        if self.phase == FormPhase::Submitting {
            return None;
        }

        let values = self.values();
        for field in UserField::ALL {
            let error = validation::validate(field, values.value(field)).err();
            if let Some(form_field) = self.form.get_field_mut(Self::field_index(field)) {
                form_field.validation_error = error;
            }
        }

        match values.to_request() {
            Ok(request) => {
                self.phase = FormPhase::Submitting;
                Some(request)
            }
            Err(_) => None,
        }
    }

    /// Apply the server's answer: reset on success, keep values on failure
    pub fn finish_submit(&mut self, notification: &Notification) {
        self.phase = FormPhase::Editing;
        if notification.is_success() {
            self.form.reset();
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        if key.code == KeyCode::Esc {
            if let Some(field) = self.form.get_current_field_mut() {
                if field.show_dropdown {
                    field.show_dropdown = false;
                    return ScreenAction::None;
                }
            }
            return ScreenAction::NavigateTo(Screen::Courses);
        }

        // Inputs and the submit control are disabled while submitting
        if self.phase == FormPhase::Submitting {
            return ScreenAction::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return self.submit_action();
        }

        let dropdown_open = self
            .form
            .get_field(self.form.get_current_field())
            .map(|f| f.show_dropdown)
            .unwrap_or(false);

        if dropdown_open {
            if let Some(field) = self.form.get_current_field_mut() {
                match key.code {
                    KeyCode::Up => field.dropdown_up(),
                    KeyCode::Down => field.dropdown_down(),
                    KeyCode::Enter | KeyCode::Char(' ') => field.select_dropdown_value(),
                    _ => {}
                }
            }
            return ScreenAction::None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.previous_field(),
            KeyCode::Enter => {
                let is_dropdown = self
                    .form
                    .get_field(self.form.get_current_field())
                    .map(|f| f.field_type == FormFieldType::Dropdown)
                    .unwrap_or(false);
                if is_dropdown {
                    if let Some(field) = self.form.get_current_field_mut() {
                        field.toggle_dropdown();
                    }
                } else {
                    return self.submit_action();
                }
            }
            KeyCode::Char(c) => self.form.handle_char_input(c),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Delete => self.form.handle_delete(),
            KeyCode::Left => self.with_current(FormField::move_cursor_left),
            KeyCode::Right => self.with_current(FormField::move_cursor_right),
            KeyCode::Home => self.with_current(FormField::move_cursor_to_start),
            KeyCode::End => self.with_current(FormField::move_cursor_to_end),
            _ => {}
        }
        ScreenAction::None
    }

    fn with_current(&mut self, f: impl FnOnce(&mut FormField)) {
        if let Some(field) = self.form.get_current_field_mut() {
            f(field);
        }
    }

    fn submit_action(&mut self) -> ScreenAction {
        match self.begin_submit() {
            Some(request) => ScreenAction::SubmitUser(request),
            None if self.phase == FormPhase::Submitting => ScreenAction::None,
            None => ScreenAction::SetError("Please fix the highlighted fields".to_string()),
        }
    }

    /// Draw the user form screen
    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Form
                Constraint::Length(4), // Instructions
            ])
            .split(area);

        let (title, style) = match self.phase {
            FormPhase::Editing => ("Add new user", Styles::title()),
            FormPhase::Submitting => ("Add new user - Submitting...", Styles::warning()),
        };
        let title_widget = Paragraph::new(title)
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title_widget, chunks[0]);

        let mut constraints: Vec<Constraint> =
            self.form.fields.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Length(3)); // Submit button
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(chunks[1]);

        for (i, field) in self.form.fields.iter().enumerate() {
            field.render(f, rows[i]);
        }

        let submit_label = match self.phase {
            FormPhase::Editing => "[ Add user ]  (Ctrl+S)",
            FormPhase::Submitting => "[ Adding user... ]",
        };
        let submit_style = match self.phase {
            FormPhase::Editing => Styles::success(),
            FormPhase::Submitting => Styles::inactive(),
        };
        let submit = Paragraph::new(submit_label)
            .style(submit_style)
            .block(Block::default().borders(Borders::ALL).border_style(Styles::inactive_border()));
        f.render_widget(submit, rows[self.form.fields.len()]);

        // Dropdown pops up below its field
        let current = self.form.get_current_field();
        if let Some(field) = self.form.get_field_mut(current) {
            if field.show_dropdown {
                let anchor = rows[current];
                let height = (field.dropdown_options.len() as u16 + 2).min(area.height);
                let popup = Rect {
                    x: anchor.x,
                    y: (anchor.y + anchor.height).min(area.bottom().saturating_sub(height)),
                    width: anchor.width.min(30),
                    height,
                };
                field.render_dropdown(f, popup);
            }
        }

        let instructions = vec![
            Line::from("Tab/↓: Next field | Shift+Tab/↑: Previous field | Enter: Submit / choose role"),
            Line::from("Ctrl+S: Submit | ESC: Back to courses"),
        ];
        let instructions_widget = Paragraph::new(instructions).style(Styles::info()).block(
            Block::default()
                .title("Instructions")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(instructions_widget, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut UserFormScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    fn fill(screen: &mut UserFormScreen, password: &str) {
        type_text(screen, "Pham Thi D");
        screen.handle_key_event(key(KeyCode::Tab));
        type_text(screen, "a@b.com");
        screen.handle_key_event(key(KeyCode::Tab));
        type_text(screen, "0987654321");
        screen.handle_key_event(key(KeyCode::Tab));
        type_text(screen, password);
        screen.handle_key_event(key(KeyCode::Tab));
        // Open role dropdown, pick "Teacher"
        screen.handle_key_event(key(KeyCode::Enter));
        screen.handle_key_event(key(KeyCode::Enter));
    }

    #[test]
    fn test_short_password_blocks_submission() {
        let mut screen = UserFormScreen::new();
        fill(&mut screen, "12345");

        assert!(screen.begin_submit().is_none());
        assert_eq!(screen.phase, FormPhase::Editing);
        assert!(screen.field(UserField::Password).unwrap().validation_error.is_some());
        assert!(screen.field(UserField::Email).unwrap().validation_error.is_none());
    }

    #[test]
    fn test_valid_form_submits_once() {
        let mut screen = UserFormScreen::new();
        fill(&mut screen, "123456");

        let action = screen.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        let request = match action {
            ScreenAction::SubmitUser(request) => request,
            other => panic!("expected submit, got {:?}", other),
        };
        assert_eq!(request.role, Role::Teacher);
        assert_eq!(request.email, "a@b.com");
        assert_eq!(screen.phase, FormPhase::Submitting);

        // Submit control disabled while in flight
        assert!(screen.begin_submit().is_none());
        assert_eq!(
            screen.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            ScreenAction::None
        );
    }

    #[test]
    fn test_success_resets_every_field() {
        let mut screen = UserFormScreen::new();
        fill(&mut screen, "123456");
        screen.begin_submit().unwrap();

        screen.finish_submit(&Notification::success("ok"));
        assert_eq!(screen.phase, FormPhase::Editing);
        assert_eq!(screen.values(), UserFormValues::default());
        assert_eq!(screen.form.get_current_field(), 0);
    }

    #[test]
    fn test_failure_keeps_values() {
        let mut screen = UserFormScreen::new();
        fill(&mut screen, "123456");
        let before = screen.values();
        screen.begin_submit().unwrap();

        screen.finish_submit(&Notification::error("Email already in use"));
        assert_eq!(screen.phase, FormPhase::Editing);
        assert_eq!(screen.values(), before);
        assert!(screen.begin_submit().is_some());
    }

    #[test]
    fn test_empty_form_marks_all_fields() {
        let mut screen = UserFormScreen::new();
        assert!(matches!(
            screen.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            ScreenAction::SetError(_)
        ));
        assert!(screen.form.fields.iter().all(|f| f.validation_error.is_some()));
    }

    #[test]
    fn test_escape_goes_back_to_courses() {
        let mut screen = UserFormScreen::new();
        assert_eq!(
            screen.handle_key_event(key(KeyCode::Esc)),
            ScreenAction::NavigateTo(Screen::Courses)
        );
    }
}
