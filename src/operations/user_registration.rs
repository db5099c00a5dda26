//! Admin-created user accounts

use tracing::{info, warn};

use super::Notification;
use crate::api::{AdminApi, ApiError};
use crate::models::UserRegistrationRequest;
use crate::validation::{UserField, UserFormValues};

pub const CREATE_SUCCESS: &str = "User created successfully!";
pub const GENERIC_FAILURE: &str = "Something went wrong!";

/// Message shown for a failed registration: the server's own message when
/// it sent one, a generic one otherwise
pub fn failure_message(error: &ApiError) -> String {
    error
        .server_message()
        .unwrap_or(GENERIC_FAILURE)
        .to_string()
}

/// Send an already validated registration request
pub async fn register_user(api: &dyn AdminApi, request: &UserRegistrationRequest) -> Notification {
    match api.register_user(request).await {
        Ok(()) => {
            info!("Created {} account {}", request.role.as_str(), request.email);
            Notification::success(CREATE_SUCCESS)
        }
        Err(e) => {
            warn!("Failed to create account {}: {}", request.email, e);
            Notification::error(failure_message(&e))
        }
    }
}

/// Validate form values and submit them. Invalid values never reach the network.
pub async fn submit_user_form(
    api: &dyn AdminApi,
    values: &UserFormValues,
) -> Result<Notification, Vec<(UserField, String)>> {
    let request = values.to_request()?;
    Ok(register_user(api, &request).await)
}
