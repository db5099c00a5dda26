use clap::{Parser, Subcommand};

use crate::models::{ModerationAction, Role};

#[derive(Parser)]
#[command(name = "course-console")]
#[command(about = "Admin console for moderating courses and provisioning users on the course platform")]
#[command(version)]
pub struct Cli {
    /// Base URL of the course platform API (overrides COURSE_CONSOLE_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive terminal UI (default)
    Tui,

    /// Inspect and moderate courses
    Courses {
        #[command(subcommand)]
        action: CourseCommand,
    },

    /// Provision user accounts
    Users {
        #[command(subcommand)]
        action: UserCommand,
    },
}

#[derive(Subcommand)]
pub enum CourseCommand {
    /// List all courses with their moderation status
    List,

    /// Publish a course that is pending review
    Approve {
        /// Course identifier
        id: String,
    },

    /// Reject a course that is pending review
    Reject {
        /// Course identifier
        id: String,
    },

    /// Delete a course
    Delete {
        /// Course identifier
        id: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a teacher or student account
    Create {
        /// Full name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Phone number
        #[arg(long)]
        phone: String,

        /// Initial password (at least 6 characters)
        #[arg(long)]
        password: String,

        /// Account role (teacher, student)
        #[arg(long)]
        role: String,
    },
}

impl Commands {
    pub fn parse_role(role: &str) -> Result<Role, anyhow::Error> {
        match role.to_lowercase().as_str() {
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(anyhow::anyhow!(
                "Unsupported role: {}. Supported roles: teacher, student",
                other
            )),
        }
    }
}

impl CourseCommand {
    /// Moderation decision carried by this command, if any
    pub fn moderation(&self) -> Option<(ModerationAction, &str)> {
        match self {
            CourseCommand::Approve { id } => Some((ModerationAction::Approve, id.as_str())),
            CourseCommand::Reject { id } => Some((ModerationAction::Reject, id.as_str())),
            CourseCommand::List | CourseCommand::Delete { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(Commands::parse_role("Teacher").unwrap(), Role::Teacher);
        assert_eq!(Commands::parse_role("student").unwrap(), Role::Student);
        assert!(Commands::parse_role("admin").is_err());
    }

    #[test]
    fn test_reject_subcommand() {
        let cli = Cli::parse_from(["course-console", "courses", "reject", "c2"]);
        match cli.command {
            Some(Commands::Courses { action }) => {
                assert_eq!(action.moderation(), Some((ModerationAction::Reject, "c2")));
            }
            _ => panic!("expected courses subcommand"),
        }
    }

    #[test]
    fn test_global_base_url_and_default_tui() {
        let cli = Cli::parse_from(["course-console", "--api-base-url", "http://x.test/api"]);
        assert_eq!(cli.api_base_url.as_deref(), Some("http://x.test/api"));
        assert!(cli.command.is_none());
    }
}
