//! Error types for the backend REST client

use crate::session::SessionError;
use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never got a response
    #[error("Request failed: {0}")]
    Network(String),

    /// Missing, expired or rejected token (401)
    #[error("Unauthorized - sign in again")]
    Unauthorized,

    /// Signed in, but not allowed (403)
    #[error("Forbidden")]
    Forbidden,

    /// Resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The configured base URL cannot be joined with a path
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Signing in succeeded but the session could not be kept
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Message suitable for showing to the person at the keyboard
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            },
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::Forbidden => "You are not allowed to do this.".to_string(),
            Self::NotFound(_) => "The requested record was not found.".to_string(),
            Self::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Session(_) => "Signed in, but the session could not be saved.".to_string(),
            Self::Status { .. } | Self::Decode(_) | Self::InvalidUrl(_) => {
                "Something went wrong. Please try again.".to_string()
            },
        }
    }

    /// Whether the session must be dropped
    #[must_use]
    pub const fn ends_session(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Forbidden)
    }
}
