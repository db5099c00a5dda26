//! Screen modules for the console

pub mod course_detail;
pub mod course_list;
pub mod user_form;

pub use course_detail::CourseDetailScreen;
pub use course_list::CourseListScreen;
pub use user_form::{FormPhase, UserFormScreen};
