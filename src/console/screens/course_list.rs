//! Course list screen: paginated table with moderation and delete actions

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::console::{
    components::{ConfirmDialog, DialogOutcome, PendingAction},
    traits::{Navigable, Paginated, ScreenAction},
    ui::{truncate_string, Styles},
};
use crate::models::{delivery_tag, Course, CourseStatus, ModerationAction};
use crate::operations::request_moderation;

const TEACHER_WIDTH: u16 = 18;
const CATEGORY_WIDTH: u16 = 14;
const PRICE_WIDTH: u16 = 16;
const TYPE_WIDTH: u16 = 9;
const ACTIONS_WIDTH: u16 = 16;

/// Course list screen state.
///
/// The course list itself belongs to the caller and is passed to every
/// call; the screen only keeps paging, selection and dialog state.
pub struct CourseListScreen {
    pub table_state: TableState,
    pub current_page: usize,
    pub items_per_page: usize,
    pub item_count: usize,
    pub dialog: Option<ConfirmDialog>,
    /// Course whose request is in flight; actions are disabled meanwhile
    pub busy_course: Option<String>,
    pub is_loading: bool,
}

impl CourseListScreen {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            table_state: TableState::default(),
            current_page: 0,
            items_per_page: items_per_page.max(1),
            item_count: 0,
            dialog: None,
            busy_course: None,
            is_loading: false,
        }
    }

    /// Keep page and selection valid after the list changed
    pub fn sync_courses(&mut self, count: usize) {
        self.item_count = count;
        if count == 0 {
            self.current_page = 0;
            self.table_state.select(None);
            return;
        }

        let last_page = self.get_total_pages() - 1;
        if self.current_page > last_page {
            self.current_page = last_page;
        }
        let on_page = self.page_len();
        let selected = self.table_state.selected().unwrap_or(0).min(on_page - 1);
        self.table_state.select(Some(selected));
    }

    fn page_start(&self) -> usize {
        self.current_page * self.items_per_page
    }

    fn page_len(&self) -> usize {
        self.item_count
            .saturating_sub(self.page_start())
            .min(self.items_per_page)
    }

    /// Courses on the current page
    pub fn page<'a>(&self, courses: &'a [Course]) -> &'a [Course] {
        let start = self.page_start().min(courses.len());
        let end = (start + self.items_per_page).min(courses.len());
        &courses[start..end]
    }

    pub fn selected_course<'a>(&self, courses: &'a [Course]) -> Option<&'a Course> {
        self.get_selected_index().and_then(|idx| courses.get(idx))
    }

    pub fn is_busy(&self) -> bool {
        self.busy_course.is_some()
    }

    /// Mark the in-flight request as finished, re-enabling actions
    pub fn finish_action(&mut self) {
        self.busy_course = None;
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, courses: &[Course]) -> ScreenAction {
        if let Some(dialog) = self.dialog.as_mut() {
            return match dialog.handle_key(key) {
                DialogOutcome::Open => ScreenAction::None,
                DialogOutcome::Cancelled => {
                    self.dialog = None;
                    ScreenAction::SetStatus("Cancelled".to_string())
                }
                DialogOutcome::Confirmed(action) => {
                    self.dialog = None;
                    self.start(action)
                }
            };
        }

        match key.code {
            KeyCode::Up => self.navigate_up(),
            KeyCode::Down => self.navigate_down(),
            KeyCode::Left | KeyCode::PageUp => self.previous_page(),
            KeyCode::Right | KeyCode::PageDown => self.next_page(),
            KeyCode::Home => self.go_to_first_page(),
            KeyCode::End => self.go_to_last_page(),
            KeyCode::Enter | KeyCode::Char('v') => {
                if let Some(course) = self.selected_course(courses) {
                    return ScreenAction::OpenCourse(course.clone());
                }
            }
            KeyCode::Char('a') => return self.open_moderation(ModerationAction::Approve, courses),
            KeyCode::Char('r') => return self.open_moderation(ModerationAction::Reject, courses),
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.is_busy() {
                    return busy_error();
                }
                if let Some(course) = self.selected_course(courses) {
                    self.dialog = Some(ConfirmDialog::for_delete(course));
                }
            }
            KeyCode::Char('R') | KeyCode::F(5) => {
                if !self.is_loading {
                    return ScreenAction::RefreshCourses;
                }
            }
            _ => {}
        }
        ScreenAction::None
    }

    fn open_moderation(&mut self, action: ModerationAction, courses: &[Course]) -> ScreenAction {
        if self.is_busy() {
            return busy_error();
        }
        let Some(course) = self.selected_course(courses) else {
            return ScreenAction::None;
        };
        match request_moderation(action, course) {
            Ok(prompt) => {
                self.dialog = Some(ConfirmDialog::from_prompt(prompt));
                ScreenAction::None
            }
            Err(notification) => ScreenAction::SetError(notification.message),
        }
    }

    fn start(&mut self, action: PendingAction) -> ScreenAction {
        match action {
            PendingAction::Delete(course_id) => {
                self.busy_course = Some(course_id.clone());
                ScreenAction::DeleteCourse(course_id)
            }
            PendingAction::Moderate(action, course_id) => {
                self.busy_course = Some(course_id.clone());
                ScreenAction::ModerateCourse(action, course_id)
            }
        }
    }

    /// Draw the course list screen
    pub fn draw(&mut self, f: &mut Frame, area: Rect, courses: &[Course]) {
        self.sync_courses(courses.len());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Table
                Constraint::Length(4), // Instructions and pagination
            ])
            .split(area);

        self.draw_title(f, chunks[0], courses.len());
        self.draw_table(f, chunks[1], courses);
        self.draw_bottom_info(f, chunks[2]);

        if let Some(dialog) = &self.dialog {
            dialog.render(f, area);
        }
    }

    fn draw_title(&self, f: &mut Frame, area: Rect, total: usize) {
        let (text, style) = if self.is_loading {
            ("Courses - Loading...".to_string(), Styles::warning())
        } else if self.is_busy() {
            ("Courses - Working...".to_string(), Styles::warning())
        } else {
            (format!("Courses - {} total", total), Styles::title())
        };

        let title = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn draw_table(&mut self, f: &mut Frame, area: Rect, courses: &[Course]) {
        let page = self.page(courses);

        if page.is_empty() {
            let message = if self.is_loading {
                "Loading courses..."
            } else {
                "No courses found. Press R to refresh."
            };
            let empty = Paragraph::new(message).style(Styles::inactive()).block(
                Block::default()
                    .title("Course list")
                    .borders(Borders::ALL)
                    .border_style(Styles::inactive_border()),
            );
            f.render_widget(empty, area);
            return;
        }

        let fixed = TEACHER_WIDTH + CATEGORY_WIDTH + PRICE_WIDTH + TYPE_WIDTH + ACTIONS_WIDTH;
        // Borders, highlight symbol and column spacing
        let summary_width = area.width.saturating_sub(fixed + 2 + 2 + 5).max(12) as usize;

        let header = Row::new(vec!["Course", "Teacher", "Category", "Price", "Type", "Actions"])
            .style(Styles::header())
            .bottom_margin(1);

        let rows: Vec<Row> = page
            .iter()
            .map(|course| self.course_row(course, summary_width))
            .collect();

        let widths = [
            Constraint::Min(summary_width as u16),
            Constraint::Length(TEACHER_WIDTH),
            Constraint::Length(CATEGORY_WIDTH),
            Constraint::Length(PRICE_WIDTH),
            Constraint::Length(TYPE_WIDTH),
            Constraint::Length(ACTIONS_WIDTH),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title("Course list")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected())
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn course_row(&self, course: &Course, summary_width: usize) -> Row<'static> {
        let thumbnail = if course.image_url().is_some() { "▣ " } else { "□ " };
        let summary = Text::from(vec![
            Line::from(vec![
                Span::raw(thumbnail),
                Span::styled(
                    truncate_string(&course.name, summary_width.saturating_sub(2)),
                    Styles::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                truncate_string(&course.description, summary_width),
                Styles::inactive(),
            )),
        ]);

        let (tag, tag_color) = delivery_tag(course.delivery_type);

        let is_busy = self.busy_course.as_deref() == Some(course.id.as_str());
        let hints = if is_busy {
            "⟳ working..."
        } else if course.status == CourseStatus::Pending {
            "[a] [r] [d]"
        } else {
            "[d]"
        };
        let actions = Text::from(vec![
            Line::from(Span::styled(course.status.label(), Styles::tag(course.status.color()))),
            Line::from(Span::styled(hints, Styles::info())),
        ]);

        Row::new(vec![
            Cell::from(summary),
            Cell::from(truncate_string(course.teacher_display(), TEACHER_WIDTH as usize)),
            Cell::from(truncate_string(course.category_display(), CATEGORY_WIDTH as usize)),
            Cell::from(course.price_display()),
            Cell::from(Span::styled(tag, Styles::tag(tag_color))),
            Cell::from(actions),
        ])
        .height(2)
        .bottom_margin(1)
    }

    fn draw_bottom_info(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let instructions = vec![
            Line::from("↑/↓: Navigate | ←/→: Pages | Enter: View | R/F5: Refresh"),
            Line::from("a: Approve | r: Reject | d: Delete | F3: New user"),
        ];

        let instructions_widget = Paragraph::new(instructions).style(Styles::info()).block(
            Block::default()
                .title("Instructions")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(instructions_widget, chunks[0]);

        let total_pages = self.get_total_pages();
        let pagination_text = if total_pages > 0 {
            format!(
                "Page {} of {}\nItem {} of {}",
                self.current_page + 1,
                total_pages,
                self.get_selected_index().map(|i| i + 1).unwrap_or(0),
                self.item_count
            )
        } else {
            "No pages".to_string()
        };

        let pagination_widget = Paragraph::new(pagination_text).style(Styles::info()).block(
            Block::default()
                .title("Navigation")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(pagination_widget, chunks[1]);
    }
}

fn busy_error() -> ScreenAction {
    ScreenAction::SetError("Please wait for the current request to finish".to_string())
}

impl Navigable for CourseListScreen {
    fn navigate_up(&mut self) {
        if self.item_count == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        if current > 0 {
            self.table_state.select(Some(current - 1));
        } else if self.current_page > 0 {
            // Previous page, last row
            self.current_page -= 1;
            self.table_state.select(Some(self.page_len() - 1));
        }
    }

    fn navigate_down(&mut self) {
        if self.item_count == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        if current + 1 < self.page_len() {
            self.table_state.select(Some(current + 1));
        } else if self.current_page + 1 < self.get_total_pages() {
            // Next page, first row
            self.current_page += 1;
            self.table_state.select(Some(0));
        }
    }

    /// Index into the full course list
    fn get_selected_index(&self) -> Option<usize> {
        self.table_state
            .selected()
            .map(|idx| self.page_start() + idx)
            .filter(|&idx| idx < self.item_count)
    }
}

impl Paginated for CourseListScreen {
    fn get_current_page(&self) -> usize {
        self.current_page
    }

    fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
        self.table_state.select(if self.page_len() == 0 { None } else { Some(0) });
    }

    fn get_total_pages(&self) -> usize {
        self.item_count.div_ceil(self.items_per_page)
    }
}
