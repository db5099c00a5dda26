//! Row actions of the course list: delete and moderation

use tracing::{info, warn};

use super::Notification;
use crate::api::AdminApi;
use crate::models::{Course, ModerationAction, TagColor};

pub const DELETE_SUCCESS: &str = "Course deleted successfully";
pub const DELETE_FAILURE: &str = "Could not delete the course. Please try again.";

/// Confirmation dialog content for a moderation action
#[derive(Debug, Clone, PartialEq)]
pub struct ModerationPrompt {
    pub action: ModerationAction,
    pub course_id: String,
    pub course_name: String,
    pub title: String,
    pub content: String,
    pub icon: (&'static str, TagColor),
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
}

/// Build the confirmation prompt for `action` on `course`.
///
/// Only pending courses can be moderated; anything else yields an error
/// notification and no prompt.
pub fn request_moderation(
    action: ModerationAction,
    course: &Course,
) -> Result<ModerationPrompt, Notification> {
    if !action.is_allowed_from(course.status) {
        return Err(Notification::error(format!(
            "Only pending courses can be moderated ('{}' is {})",
            course.name,
            course.status.label().to_lowercase()
        )));
    }

    let icon = match action {
        ModerationAction::Approve => ("✔", TagColor::Green),
        ModerationAction::Reject => ("✖", TagColor::Red),
    };

    Ok(ModerationPrompt {
        action,
        course_id: course.id.clone(),
        course_name: course.name.clone(),
        title: format!("Confirm: {} course", action.verb()),
        content: format!("Are you sure you want to {} this course?", action.verb()),
        icon,
        confirm_label: action.confirm_label(),
        cancel_label: "Cancel",
    })
}

/// Delete a course, then refresh the list whatever the outcome
pub async fn delete_course(
    api: &dyn AdminApi,
    course_id: &str,
    refetch: impl FnOnce(),
) -> Notification {
    let notification = match api.delete_course(course_id).await {
        Ok(()) => {
            info!("Deleted course {}", course_id);
            Notification::success(DELETE_SUCCESS)
        }
        Err(e) => {
            info!("Failed to delete course {}: {}", course_id, e);
            Notification::error(DELETE_FAILURE)
        }
    };

    refetch();
    notification
}

/// Apply a confirmed moderation action, then refresh the list whatever the outcome
pub async fn moderate_course(
    api: &dyn AdminApi,
    action: ModerationAction,
    course_id: &str,
    refetch: impl FnOnce(),
) -> Notification {
    let status = action.target_status();

    let notification = match api.update_course_status(course_id, status).await {
        Ok(()) => {
            info!("Course {} is now {}", course_id, status.as_str());
            Notification::success(format!("Course {} successfully", status.as_str()))
        }
        Err(e) => {
            warn!("Failed to {} course {}: {}", action.verb(), course_id, e);
            Notification::error(format!("Failed to {} the course", action.verb()))
        }
    };

    refetch();
    notification
}
