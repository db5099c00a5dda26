//! Form field component for user input

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::console::{traits::FormHandler, ui::Styles};

/// Type of form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    Text,
    /// Text input rendered masked
    Password,
    Dropdown,
}

/// Individual form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub is_focused: bool,
    /// Cursor position in characters, not bytes
    pub cursor_position: usize,
    pub dropdown_options: Vec<String>,
    pub dropdown_state: ListState,
    pub show_dropdown: bool,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(label: &str, field_type: FormFieldType) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            is_focused: false,
            cursor_position: 0,
            dropdown_options: Vec::new(),
            dropdown_state: ListState::default(),
            show_dropdown: false,
            validation_error: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_dropdown_options(mut self, options: Vec<String>) -> Self {
        self.dropdown_options = options;
        if !self.dropdown_options.is_empty() {
            self.dropdown_state.select(Some(0));
        }
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
        if !focused {
            self.show_dropdown = false;
        }
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        let idx = self.byte_index();
        self.value.insert(idx, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.field_type != FormFieldType::Dropdown && self.cursor_position > 0 {
            self.cursor_position -= 1;
            let idx = self.byte_index();
            self.value.remove(idx);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.field_type != FormFieldType::Dropdown && self.cursor_position < self.char_count() {
            let idx = self.byte_index();
            self.value.remove(idx);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }

    /// Back to empty, with no dropdown option chosen
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        self.validation_error = None;
        self.show_dropdown = false;
        if !self.dropdown_options.is_empty() {
            self.dropdown_state.select(Some(0));
        }
    }

    pub fn toggle_dropdown(&mut self) {
        if self.field_type == FormFieldType::Dropdown {
            self.show_dropdown = !self.show_dropdown;
        }
    }

    /// Handle dropdown navigation
    pub fn dropdown_up(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        let selected = self.dropdown_state.selected().unwrap_or(0);
        let new_selected = if selected == 0 {
            self.dropdown_options.len() - 1
        } else {
            selected - 1
        };
        self.dropdown_state.select(Some(new_selected));
    }

    pub fn dropdown_down(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        let selected = self.dropdown_state.selected().unwrap_or(0);
        let new_selected = (selected + 1) % self.dropdown_options.len();
        self.dropdown_state.select(Some(new_selected));
    }

    pub fn select_dropdown_value(&mut self) {
        if let Some(selected) = self.dropdown_state.selected() {
            if let Some(value) = self.dropdown_options.get(selected) {
                self.value = value.clone();
                self.cursor_position = self.char_count();
                self.show_dropdown = false;
                self.validation_error = None;
            }
        }
    }

    fn display_value(&self) -> String {
        match self.field_type {
            FormFieldType::Password => "•".repeat(self.char_count()),
            _ => self.value.clone(),
        }
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let display_text = if self.value.is_empty() && !self.placeholder.is_empty() {
            self.placeholder.clone()
        } else {
            self.display_value()
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.validation_error.is_some() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let title = if let Some(ref error) = self.validation_error {
            format!("{} - {}", self.label, error)
        } else if self.field_type == FormFieldType::Dropdown {
            format!("{} (Enter to choose)", self.label)
        } else {
            self.label.clone()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if self.value.is_empty() && !self.placeholder.is_empty() {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let paragraph = Paragraph::new(display_text)
            .style(text_style)
            .block(block);

        f.render_widget(paragraph, area);

        // Render cursor if focused and not a dropdown
        if self.is_focused && self.field_type != FormFieldType::Dropdown {
            let before_cursor: String = self.display_value().chars().take(self.cursor_position).collect();
            let cursor_x = area.x + 1 + before_cursor.width() as u16;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }

    /// Render dropdown if visible
    pub fn render_dropdown(&mut self, f: &mut Frame, area: Rect) {
        if !self.show_dropdown || self.dropdown_options.is_empty() {
            return;
        }

        let items: Vec<ListItem> = self
            .dropdown_options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == self.dropdown_state.selected() {
                    Styles::selected()
                } else {
                    Style::default()
                };
                ListItem::new(option.clone()).style(style)
            })
            .collect();

        let block = Block::default()
            .title("Options")
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        let list = List::new(items).block(block);

        f.render_widget(ratatui::widgets::Clear, area);
        f.render_stateful_widget(list, area, &mut self.dropdown_state);
    }
}

/// Form container that manages multiple fields
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self {
            fields,
            current_field: 0,
        };
        form.update_focus();
        form
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current_field);
        }
    }

    pub fn get_field(&self, index: usize) -> Option<&FormField> {
        self.fields.get(index)
    }

    pub fn get_field_mut(&mut self, index: usize) -> Option<&mut FormField> {
        self.fields.get_mut(index)
    }

    pub fn get_current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    /// Clear every field and focus the first one
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.current_field = 0;
        self.update_focus();
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some(field) = self.get_current_field_mut() {
            field.insert_char(c);
        }
    }

    fn handle_backspace(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char();
        }
    }

    fn handle_delete(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char_forward();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multibyte_editing() {
        let mut field = FormField::new("Name", FormFieldType::Text);
        for c in "Hòa".chars() {
            field.insert_char(c);
        }
        field.move_cursor_left();
        field.delete_char();
        assert_eq!(field.value, "Ha");
        field.move_cursor_to_end();
        field.insert_char('!');
        assert_eq!(field.value, "Ha!");
    }

    #[test]
    fn test_password_is_masked() {
        let mut field = FormField::new("Password", FormFieldType::Password);
        field.insert_char('a');
        field.insert_char('b');
        assert_eq!(field.display_value(), "••");
        assert_eq!(field.value, "ab");
    }

    #[test]
    fn test_dropdown_selection_and_clear() {
        let mut field = FormField::new("Role", FormFieldType::Dropdown)
            .with_dropdown_options(vec!["Teacher".to_string(), "Student".to_string()]);
        field.insert_char('x');
        assert_eq!(field.value, "");

        field.dropdown_down();
        field.select_dropdown_value();
        assert_eq!(field.value, "Student");

        field.clear();
        assert_eq!(field.value, "");
        assert_eq!(field.dropdown_state.selected(), Some(0));
    }

    #[test]
    fn test_form_navigation_wraps() {
        let mut form = Form::new(vec![
            FormField::new("A", FormFieldType::Text),
            FormField::new("B", FormFieldType::Text),
        ]);
        form.previous_field();
        assert_eq!(form.get_current_field(), 1);
        assert!(form.fields[1].is_focused);
        form.next_field();
        assert_eq!(form.get_current_field(), 0);
    }
}
