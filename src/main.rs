use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use course_console::{
    api::{AdminApi, HttpAdminApi},
    cli::{Cli, CourseCommand, Commands, UserCommand},
    config::Config,
    console::{ui::truncate_string, App},
    models::{delivery_tag, Course},
    operations::{self, Notification},
    validation::UserFormValues,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "course_console=info");
    }

    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_base_url.clone() {
        config = config.with_api_base_url(url);
    }

    let command = cli.command.unwrap_or(Commands::Tui);
    init_logging(&config, matches!(command, Commands::Tui));
    config.validate()?;

    let api: Arc<dyn AdminApi> = Arc::new(HttpAdminApi::new(&config)?);

    match command {
        Commands::Tui => run_tui(config, api).await,
        Commands::Courses { action } => handle_course_command(action, api.as_ref()).await,
        Commands::Users { action } => handle_user_command(action, api.as_ref()).await,
    }
}

/// Log to the configured file, and to stderr as well outside the TUI
fn init_logging(config: &Config, tui_mode: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_path = Path::new(&config.log_file);
    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "course-console.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env());

    // Writing to stderr would corrupt the alternate screen
    let stderr_layer = (!tui_mode).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

async fn run_tui(config: Config, api: Arc<dyn AdminApi>) -> Result<()> {
    info!("Starting course console against {}", config.api_base());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, api);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(_) => {
            info!("Course console exited successfully");
        }
        Err(e) => {
            error!("Course console encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Handle course subcommands - print output and exit
async fn handle_course_command(command: CourseCommand, api: &dyn AdminApi) -> Result<()> {
    if let Some((action, id)) = command.moderation() {
        let courses = api.list_courses().await.context("Failed to load courses")?;
        let Some(course) = courses.iter().find(|c| c.id == id) else {
            eprintln!("Course not found: {}", id);
            std::process::exit(1);
        };

        let prompt = match operations::request_moderation(action, course) {
            Ok(prompt) => prompt,
            Err(notification) => exit_with(&notification),
        };
        info!("{}: {}", prompt.title, prompt.course_name);

        let mut refetch = false;
        let notification =
            operations::moderate_course(api, action, &prompt.course_id, || refetch = true).await;
        report(&notification);
        if refetch {
            print_updated_course(api, &prompt.course_id).await;
        }
        if !notification.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    match command {
        CourseCommand::List => {
            let courses = api.list_courses().await.context("Failed to load courses")?;
            print_courses(&courses);
        }
        CourseCommand::Delete { id } => {
            let mut refetch = false;
            let notification = operations::delete_course(api, &id, || refetch = true).await;
            report(&notification);
            if refetch {
                match api.list_courses().await {
                    Ok(courses) => println!("{} courses remain", courses.len()),
                    Err(e) => error!("Failed to refresh courses: {}", e),
                }
            }
            if !notification.is_success() {
                std::process::exit(1);
            }
        }
        CourseCommand::Approve { .. } | CourseCommand::Reject { .. } => {}
    }

    Ok(())
}

/// Handle user subcommands - validate, submit and exit
async fn handle_user_command(command: UserCommand, api: &dyn AdminApi) -> Result<()> {
    match command {
        UserCommand::Create {
            name,
            email,
            phone,
            password,
            role,
        } => {
            let values = UserFormValues {
                name,
                email,
                phone,
                password,
                role: Some(Commands::parse_role(&role)?),
            };

            match operations::submit_user_form(api, &values).await {
                Ok(notification) => {
                    report(&notification);
                    if !notification.is_success() {
                        std::process::exit(1);
                    }
                }
                Err(errors) => {
                    for (field, message) in errors {
                        eprintln!("{}: {}", field.label(), message);
                    }
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn report(notification: &Notification) {
    if notification.is_success() {
        println!("{}", notification.message);
    } else {
        eprintln!("Error: {}", notification.message);
    }
}

fn exit_with(notification: &Notification) -> ! {
    report(notification);
    std::process::exit(1);
}

async fn print_updated_course(api: &dyn AdminApi, course_id: &str) {
    match api.list_courses().await {
        Ok(courses) => {
            if let Some(course) = courses.iter().find(|c| c.id == course_id) {
                println!("{} is now: {}", course.name, course.status.label());
            }
        }
        Err(e) => error!("Failed to refresh courses: {}", e),
    }
}

fn print_courses(courses: &[Course]) {
    if courses.is_empty() {
        println!("No courses found");
        return;
    }

    println!(
        "{:<10} {:<32} {:<20} {:<16} {:<16} {:<8} {:<15}",
        "ID", "Course", "Teacher", "Category", "Price", "Type", "Status"
    );
    println!("{}", "-".repeat(123));

    for course in courses {
        let (delivery, _) = delivery_tag(course.delivery_type);
        println!(
            "{:<10} {:<32} {:<20} {:<16} {:<16} {:<8} {:<15}",
            truncate_string(&course.id, 10),
            truncate_string(&course.name, 32),
            truncate_string(course.teacher_display(), 20),
            truncate_string(course.category_display(), 16),
            course.price_display(),
            delivery,
            course.status.label()
        );
    }

    println!();
    println!("Total: {} courses", courses.len());
}
