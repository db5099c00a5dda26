//! Backend API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status_code}): {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status_code: u16,
        message: Option<String>,
    },

    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Human-readable message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message: Some(message), .. } if !message.trim().is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message() {
        let err = ApiError::Status {
            status_code: 409,
            message: Some("Email already exists".to_string()),
        };
        assert_eq!(err.server_message(), Some("Email already exists"));
        assert_eq!(err.to_string(), "API error (status 409): Email already exists");

        let blank = ApiError::Status { status_code: 500, message: Some("  ".to_string()) };
        assert_eq!(blank.server_message(), None);

        let bare = ApiError::Status { status_code: 502, message: None };
        assert_eq!(bare.server_message(), None);
        assert_eq!(bare.to_string(), "API error (status 502): no message");
    }
}
