//! Terminal admin console
//!
//! Two screens, the course list and the user creation form, plus a course
//! detail view, hosted by `App` which owns the event loop.

pub mod app;
pub mod components;
pub mod events;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::{App, Screen};
pub use events::AppEvent;
