//! Error types for the dashboard core.
//!
//! Errors are classified by where they stop the flow:
//! - Unauthenticated: no valid session — halts all data operations
//! - Transport/Api: remote store failure — the enclosing load fails whole
//! - Validation: caught before submission — the modal stays open
//!
//! Record absence is never an error; fetchers return `Option`/empty lists.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No authenticated user found")]
    Unauthenticated,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Validation(String),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Returns true if the session is missing or expired and the caller
    /// should route to the unauthenticated entry point.
    pub fn is_auth(&self) -> bool {
        matches!(self, CoreError::Unauthenticated)
    }

    /// Returns true if this was caught before any store traffic.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }

    /// Message suitable for display inside a modal or the dashboard
    /// error state. Every failure here is recoverable by user retry.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Unauthenticated => "No authenticated user found. Please sign in.".to_string(),
            CoreError::Transport(_) => "Could not reach the server. Check your connection and try again.".to_string(),
            CoreError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            CoreError::Api { status, .. } => format!("The server rejected the request (status {}).", status),
            CoreError::InvalidUrl(_) => "The configured store URL is invalid.".to_string(),
            CoreError::Validation(msg) => msg.clone(),
            CoreError::Json(_) => "Received an unreadable response from the server.".to_string(),
            CoreError::Io(_) => "Could not read local application data.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_classification() {
        assert!(CoreError::Unauthenticated.is_auth());
        assert!(!CoreError::Validation("x".into()).is_auth());
    }

    #[test]
    fn api_message_passthrough() {
        let err = CoreError::Api {
            status: 409,
            message: "duplicate key".to_string(),
        };
        assert_eq!(err.user_message(), "duplicate key");

        let blank = CoreError::Api {
            status: 503,
            message: "  ".to_string(),
        };
        assert!(blank.user_message().contains("503"));
    }
}
