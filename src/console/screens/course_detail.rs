//! Course detail view, reached through `/courses/view/{id}`

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::console::{traits::ScreenAction, ui::Styles};
use crate::models::{delivery_tag, Course};

#[derive(Default)]
pub struct CourseDetailScreen {
    pub course: Option<Course>,
    pub scroll: u16,
}

impl CourseDetailScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_course(&mut self, course: Course) {
        self.course = Some(course);
        self.scroll = 0;
    }

    pub fn route(&self) -> Option<String> {
        self.course.as_ref().map(Course::detail_route)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => ScreenAction::NavigateBack,
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                ScreenAction::None
            }
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                ScreenAction::None
            }
            _ => ScreenAction::None,
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let Some(course) = &self.course else {
            let empty = Paragraph::new("No course selected")
                .style(Styles::inactive())
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(empty, area);
            return;
        };

        let label = |text: &'static str| Span::styled(format!("{:<12}", text), Styles::title());
        let (tag, tag_color) = delivery_tag(course.delivery_type);

        let lines = vec![
            Line::from(vec![label("Name"), Span::raw(course.name.clone())]),
            Line::from(vec![label("Teacher"), Span::raw(course.teacher_display().to_string())]),
            Line::from(vec![label("Category"), Span::raw(course.category_display().to_string())]),
            Line::from(vec![label("Price"), Span::raw(course.price_display())]),
            Line::from(vec![label("Type"), Span::styled(tag, Styles::tag(tag_color))]),
            Line::from(vec![
                label("Status"),
                Span::styled(course.status.label(), Styles::tag(course.status.color())),
            ]),
            Line::from(vec![
                label("Image"),
                Span::raw(course.image_url().unwrap_or("-").to_string()),
            ]),
            Line::from(""),
            Line::from(course.description.clone()),
        ];

        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .title(course.detail_route())
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );
        f.render_widget(detail, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseStatus;
    use crate::operations::testing::course;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_route_and_back() {
        let mut screen = CourseDetailScreen::new();
        assert_eq!(screen.route(), None);

        screen.set_course(course("17", CourseStatus::Hidden));
        assert_eq!(screen.route().as_deref(), Some("/courses/view/17"));
        assert_eq!(
            screen.handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            ScreenAction::NavigateBack
        );
    }
}
