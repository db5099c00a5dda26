//! Core traits shared by the console screens

use crate::console::app::Screen;
use crate::models::{Course, ModerationAction, UserRegistrationRequest};

/// Actions returned from screen event handling, applied by the app
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Navigate to a different screen
    NavigateTo(Screen),
    /// Go back to previous screen
    NavigateBack,
    /// Set status message
    SetStatus(String),
    /// Set error message
    SetError(String),
    /// Show the detail view of a course
    OpenCourse(Course),
    /// Re-fetch the course list
    RefreshCourses,
    /// Delete a course (already confirmed)
    DeleteCourse(String),
    /// Moderate a course (already confirmed)
    ModerateCourse(ModerationAction, String),
    /// Send a validated registration request
    SubmitUser(UserRegistrationRequest),
    /// No action taken
    None,
}

/// Trait for screens with navigable lists
pub trait Navigable {
    /// Move selection up
    fn navigate_up(&mut self);

    /// Move selection down
    fn navigate_down(&mut self);

    /// Get currently selected index
    fn get_selected_index(&self) -> Option<usize>;
}

/// Trait for screens with paginated content
pub trait Paginated {
    /// Get current page number (0-based)
    fn get_current_page(&self) -> usize;

    /// Set current page
    fn set_current_page(&mut self, page: usize);

    /// Get total number of pages
    fn get_total_pages(&self) -> usize;

    /// Go to next page
    fn next_page(&mut self) {
        let current = self.get_current_page();
        let total = self.get_total_pages();
        if current + 1 < total {
            self.set_current_page(current + 1);
        }
    }

    /// Go to previous page
    fn previous_page(&mut self) {
        let current = self.get_current_page();
        if current > 0 {
            self.set_current_page(current - 1);
        }
    }

    /// Go to first page
    fn go_to_first_page(&mut self) {
        self.set_current_page(0);
    }

    /// Go to last page
    fn go_to_last_page(&mut self) {
        let total = self.get_total_pages();
        if total > 0 {
            self.set_current_page(total - 1);
        }
    }
}

/// Trait for form handling
pub trait FormHandler {
    /// Get current field index
    fn get_current_field(&self) -> usize;

    /// Set current field
    fn set_current_field(&mut self, field: usize);

    /// Get total number of fields
    fn get_field_count(&self) -> usize;

    /// Move to next field
    fn next_field(&mut self) {
        let current = self.get_current_field();
        let total = self.get_field_count();
        if total > 0 {
            self.set_current_field((current + 1) % total);
        }
    }

    /// Move to previous field
    fn previous_field(&mut self) {
        let current = self.get_current_field();
        let total = self.get_field_count();
        if total > 0 {
            self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
        }
    }

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char);

    /// Handle backspace for current field
    fn handle_backspace(&mut self);

    /// Handle delete for current field
    fn handle_delete(&mut self);
}
