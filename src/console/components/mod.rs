//! Reusable UI components for the console

pub mod confirm_dialog;
pub mod form_field;
pub mod status_display;

pub use confirm_dialog::{ConfirmDialog, DialogOutcome, PendingAction};
pub use form_field::{Form, FormField, FormFieldType};
pub use status_display::{StatusDisplay, StatusMessage, StatusType};
