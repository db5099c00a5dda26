//! Main console application state and event loop

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};

use super::components::{PendingAction, StatusDisplay, StatusType};
use super::events::AppEvent;
use super::screens::*;
use super::traits::ScreenAction;
use super::ui::{centered_rect, Styles};
use crate::api::AdminApi;
use crate::config::Config;
use crate::models::{Course, UserRegistrationRequest};
use crate::operations;

/// Success and info notifications disappear after this long
const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);
const TICK: Duration = Duration::from_millis(100);

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Courses,
    NewUser,
    CourseDetail,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Courses => "Courses",
            Screen::NewUser => "New user",
            Screen::CourseDetail => "Course detail",
        }
    }
}

/// Main console application state
pub struct App {
    /// Current active screen
    pub current_screen: Screen,
    /// Previous screen for navigation
    pub previous_screen: Option<Screen>,
    /// Application configuration
    pub config: Config,
    api: Arc<dyn AdminApi>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,

    /// Authoritative course list as last fetched from the backend
    pub courses: Vec<Course>,
    /// A refresh was requested while another was still loading
    pub refresh_pending: bool,

    // Screen states
    pub course_list: CourseListScreen,
    pub user_form: UserFormScreen,
    pub course_detail: CourseDetailScreen,

    // Global application state
    pub status: StatusDisplay,
    pub should_quit: bool,
    pub show_help_popup: bool,
}

impl App {
    /// Create a new console application
    pub fn new(config: Config, api: Arc<dyn AdminApi>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            current_screen: Screen::Courses,
            previous_screen: None,
            course_list: CourseListScreen::new(config.page_size),
            config,
            api,
            events_tx,
            events_rx,

            courses: Vec::new(),
            refresh_pending: false,

            user_form: UserFormScreen::new(),
            course_detail: CourseDetailScreen::new(),

            status: StatusDisplay::new().with_auto_clear(NOTIFICATION_TIMEOUT),
            should_quit: false,
            show_help_popup: false,
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.refresh_courses();

        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            self.drain_events();
            // Let spawned requests make progress on this worker too
            tokio::task::yield_now().await;

            if self.status.should_auto_clear() {
                self.status.clear();
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply every event that background requests have delivered so far
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CoursesLoaded(courses) => {
                info!("Course list refreshed: {} courses", courses.len());
                self.courses = courses;
                self.course_list.is_loading = false;
                self.course_list.sync_courses(self.courses.len());
                if matches!(
                    self.status.get_current().map(|m| &m.status_type),
                    Some(StatusType::Loading)
                ) {
                    self.status.clear();
                }
                if std::mem::take(&mut self.refresh_pending) {
                    self.refresh_courses();
                }
            }
            AppEvent::CoursesLoadFailed(message) => {
                self.course_list.is_loading = false;
                self.status.set_error(format!("Failed to load courses: {}", message));
                if std::mem::take(&mut self.refresh_pending) {
                    self.refresh_courses();
                }
            }
            AppEvent::RefreshRequested => self.refresh_courses(),
            AppEvent::CourseActionFinished(notification) => {
                self.course_list.finish_action();
                self.status.notify(notification);
            }
            AppEvent::UserSubmitFinished(notification) => {
                self.user_form.finish_submit(&notification);
                self.status.notify(notification);
            }
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help_popup = false;
            }
            return;
        }

        // Plain characters belong to the form while it is shown
        let typing = self.current_screen == Screen::NewUser;
        let dialog_open = self.current_screen == Screen::Courses && self.course_list.dialog.is_some();

        match key.code {
            // The confirmation dialog blocks everything but its own keys
            _ if dialog_open => {}
            KeyCode::F(1) => {
                self.show_help_popup = true;
                return;
            }
            KeyCode::F(2) => {
                self.navigate_to_screen(Screen::Courses);
                return;
            }
            KeyCode::F(3) => {
                self.navigate_to_screen(Screen::NewUser);
                return;
            }
            KeyCode::Char('?') if !typing => {
                self.show_help_popup = true;
                return;
            }
            KeyCode::Char('q') if !typing => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('n') if self.current_screen == Screen::Courses => {
                self.navigate_to_screen(Screen::NewUser);
                return;
            }
            _ => {}
        }

        let action = match self.current_screen {
            Screen::Courses => self.course_list.handle_key_event(key, &self.courses),
            Screen::NewUser => self.user_form.handle_key_event(key),
            Screen::CourseDetail => self.course_detail.handle_key_event(key),
        };
        self.apply(action);
    }

    fn apply(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::NavigateTo(screen) => self.navigate_to_screen(screen),
            ScreenAction::NavigateBack => self.navigate_back(),
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::OpenCourse(course) => {
                info!("Opening {}", course.detail_route());
                self.course_detail.set_course(course);
                self.navigate_to_screen(Screen::CourseDetail);
            }
            ScreenAction::RefreshCourses => self.refresh_courses(),
            ScreenAction::DeleteCourse(course_id) => {
                self.spawn_course_action(PendingAction::Delete(course_id))
            }
            ScreenAction::ModerateCourse(action, course_id) => {
                self.spawn_course_action(PendingAction::Moderate(action, course_id))
            }
            ScreenAction::SubmitUser(request) => self.spawn_user_submit(request),
            ScreenAction::None => {}
        }
    }

    /// Fetch the course list in the background. Requests made while a
    /// fetch is running are coalesced into one follow-up fetch.
    pub fn refresh_courses(&mut self) {
        if self.course_list.is_loading {
            self.refresh_pending = true;
            return;
        }

        self.course_list.is_loading = true;
        if self.status.get_current().is_none() {
            self.status.set_loading("Loading courses...".to_string());
        }

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let event = match api.list_courses().await {
                Ok(courses) => AppEvent::CoursesLoaded(courses),
                Err(e) => {
                    error!("Failed to load courses: {}", e);
                    AppEvent::CoursesLoadFailed(e.to_string())
                }
            };
            let _ = tx.send(event);
        });
    }

    fn spawn_course_action(&mut self, action: PendingAction) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let refetch_tx = tx.clone();
            let refetch = move || {
                let _ = refetch_tx.send(AppEvent::RefreshRequested);
            };

            let notification = match action {
                PendingAction::Delete(course_id) => {
                    operations::delete_course(api.as_ref(), &course_id, refetch).await
                }
                PendingAction::Moderate(action, course_id) => {
                    operations::moderate_course(api.as_ref(), action, &course_id, refetch).await
                }
            };
            let _ = tx.send(AppEvent::CourseActionFinished(notification));
        });
    }

    fn spawn_user_submit(&mut self, request: UserRegistrationRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let notification = operations::register_user(api.as_ref(), &request).await;
            let _ = tx.send(AppEvent::UserSubmitFinished(notification));
        });
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Screen
                Constraint::Length(3), // Status bar
            ])
            .split(size);

        self.draw_tabs(f, chunks[0]);

        match self.current_screen {
            Screen::Courses => self.course_list.draw(f, chunks[1], &self.courses),
            Screen::NewUser => self.user_form.draw(f, chunks[1]),
            Screen::CourseDetail => self.course_detail.draw(f, chunks[1]),
        }

        let idle_text = format!(
            "{} | F2: Courses | F3: New user | F1/?: Help | q: Quit",
            self.current_screen.title()
        );
        self.status.render(f, chunks[2], &idle_text);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_tabs(&self, f: &mut Frame, area: Rect) {
        let selected = match self.current_screen {
            Screen::NewUser => 1,
            Screen::Courses | Screen::CourseDetail => 0,
        };

        let tabs = Tabs::new(vec!["Courses [F2]", "New user [F3]"])
            .select(selected)
            .style(Styles::inactive())
            .highlight_style(Styles::selected())
            .block(
                Block::default()
                    .title(format!("Course console - {}", self.config.api_base()))
                    .borders(Borders::ALL),
            );
        f.render_widget(tabs, area);
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 60, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    /// Get context-sensitive help content
    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            F2 - Courses\n\
            F3 - New user\n\
            F1 / ? - Toggle this help\n\
            q / Ctrl+C - Quit\n\n";

        let screen_help = match self.current_screen {
            Screen::Courses => {
                "Courses:\n\
                ↑/↓ - Navigate rows\n\
                ←/→ - Previous/next page\n\
                Enter - View course\n\
                a - Approve pending course\n\
                r - Reject pending course\n\
                d - Delete course\n\
                R / F5 - Refresh list\n\
                n - New user"
            }
            Screen::NewUser => {
                "New user:\n\
                Tab / ↓ - Next field\n\
                Shift+Tab / ↑ - Previous field\n\
                Enter - Submit, or choose role on the role field\n\
                Ctrl+S - Submit\n\
                ESC - Back to courses"
            }
            Screen::CourseDetail => {
                "Course detail:\n\
                ↑/↓ - Scroll\n\
                ESC - Back to the list"
            }
        };

        format!("{}{}", global_help, screen_help)
    }

    /// Navigate to a specific screen
    pub fn navigate_to_screen(&mut self, screen: Screen) {
        if screen != self.current_screen {
            self.previous_screen = Some(self.current_screen);
            self.current_screen = screen;
        }
    }

    pub fn navigate_back(&mut self) {
        let target = self.previous_screen.take().unwrap_or(Screen::Courses);
        self.current_screen = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseStatus, Role};
    use crate::operations::testing::{course, Call, RecordingApi};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    impl App {
        /// Wait for and apply `count` background events
        async fn pump(&mut self, count: usize) {
            for _ in 0..count {
                let event = self.events_rx.recv().await.expect("event channel closed");
                self.handle_app_event(event);
            }
        }
    }

    fn app_with(api: Arc<RecordingApi>, courses: Vec<Course>) -> App {
        let mut app = App::new(Config::default(), api);
        app.handle_app_event(AppEvent::CoursesLoaded(courses));
        app
    }

    #[tokio::test]
    async fn test_reject_then_refresh_once() {
        for failing in [false, true] {
            let api = Arc::new(if failing {
                RecordingApi::failing(500, None)
            } else {
                RecordingApi::default()
            });
            let mut app = app_with(api.clone(), vec![course("c1", CourseStatus::Pending)]);

            app.handle_key_event(key(KeyCode::Char('r')));
            app.handle_key_event(key(KeyCode::Enter));
            assert!(app.course_list.is_busy());

            // RefreshRequested, CourseActionFinished, CoursesLoaded
            app.pump(3).await;

            assert_eq!(
                api.calls(),
                vec![
                    Call::UpdateStatus("c1".to_string(), CourseStatus::Rejected),
                    Call::ListCourses,
                ]
            );
            assert!(!app.course_list.is_busy());
            let expected = if failing { StatusType::Error } else { StatusType::Success };
            assert_eq!(app.status.get_current().map(|m| m.status_type.clone()), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_delete_after_confirmation() {
        let api = Arc::new(RecordingApi::default());
        let mut app = app_with(api.clone(), vec![course("c3", CourseStatus::Draft)]);

        app.handle_key_event(key(KeyCode::Char('d')));
        app.handle_key_event(key(KeyCode::Char('y')));
        app.pump(3).await;

        assert_eq!(
            api.calls(),
            vec![Call::DeleteCourse("c3".to_string()), Call::ListCourses]
        );
    }

    #[tokio::test]
    async fn test_open_dialog_blocks_global_keys() {
        let api = Arc::new(RecordingApi::default());
        let mut app = app_with(api.clone(), vec![course("c4", CourseStatus::Pending)]);

        app.handle_key_event(key(KeyCode::Char('a')));
        assert!(app.course_list.dialog.is_some());

        for code in [KeyCode::F(1), KeyCode::F(3), KeyCode::Char('?'), KeyCode::Char('q')] {
            app.handle_key_event(key(code));
            assert_eq!(app.current_screen, Screen::Courses);
            assert!(!app.show_help_popup);
            assert!(!app.should_quit);
            assert!(app.course_list.dialog.is_some());
        }

        app.handle_key_event(key(KeyCode::Esc));
        assert!(app.course_list.dialog.is_none());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_user_submit_resets_form_on_success() {
        let api = Arc::new(RecordingApi::default());
        let mut app = app_with(api.clone(), Vec::new());
        app.handle_key_event(key(KeyCode::F(3)));
        assert_eq!(app.current_screen, Screen::NewUser);

        for (i, text) in ["Vo Van E", "e@school.vn", "0900000000", "hunter22"].iter().enumerate() {
            if i > 0 {
                app.handle_key_event(key(KeyCode::Tab));
            }
            for c in text.chars() {
                app.handle_key_event(key(KeyCode::Char(c)));
            }
        }
        app.handle_key_event(key(KeyCode::Tab));
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(key(KeyCode::Down));
        app.handle_key_event(key(KeyCode::Enter));
        app.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        app.pump(1).await;

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], Call::RegisterUser(r) if r.role == Role::Student));
        assert_eq!(app.user_form.phase, FormPhase::Editing);
        assert_eq!(app.user_form.values(), Default::default());
    }

    #[tokio::test]
    async fn test_q_types_into_form_instead_of_quitting() {
        let api = Arc::new(RecordingApi::default());
        let mut app = app_with(api, Vec::new());
        app.navigate_to_screen(Screen::NewUser);
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.user_form.values().name, "q");

        app.navigate_to_screen(Screen::Courses);
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_open_detail_and_back() {
        let api = Arc::new(RecordingApi::default());
        let mut app = app_with(api, vec![course("c5", CourseStatus::Published)]);
        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.current_screen, Screen::CourseDetail);
        assert_eq!(app.course_detail.route().as_deref(), Some("/courses/view/c5"));

        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.current_screen, Screen::Courses);
    }

    #[tokio::test]
    async fn test_refresh_requests_are_coalesced() {
        let api = Arc::new(RecordingApi::default());
        let mut app = App::new(Config::default(), api.clone());
        app.refresh_courses();
        app.refresh_courses();
        assert!(app.refresh_pending);

        // First load, then the follow-up load
        app.pump(2).await;
        assert_eq!(api.calls(), vec![Call::ListCourses, Call::ListCourses]);
        assert!(!app.refresh_pending);
        assert!(!app.course_list.is_loading);
    }
}
