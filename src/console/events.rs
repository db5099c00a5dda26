//! Events delivered to the app loop by background requests

use crate::models::Course;
use crate::operations::Notification;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Course list fetched
    CoursesLoaded(Vec<Course>),
    /// Course list fetch failed
    CoursesLoadFailed(String),
    /// A course action asked for the list to be re-fetched
    RefreshRequested,
    /// Delete or moderation request finished
    CourseActionFinished(Notification),
    /// User registration request finished
    UserSubmitFinished(Notification),
}
