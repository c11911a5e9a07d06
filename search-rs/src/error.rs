//! Error types for search-rs

use thiserror::Error;

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Message shown when the backend gives no usable explanation
pub const GENERIC_FAILURE_MESSAGE: &str = "Search failed";

/// Search error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No term supplied; callers treat this as "nothing to do"
    #[error("Empty search term")]
    EmptyTerm,

    /// Query parameters out of range
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Transport-level failure, no response received
    #[error("Network error: {0}")]
    NetworkFailure(String),

    /// Backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Backend answered 2xx but the body does not match the contract
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    /// Message stored in the session when a fetch fails
    pub fn user_message(&self) -> String {
        match self {
            SearchError::ServerError { message, .. } => message.clone(),
            SearchError::MalformedResponse(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_uses_backend_message() {
        let err = SearchError::ServerError {
            status: 503,
            message: "Index unavailable".to_string(),
        };
        assert_eq!(err.user_message(), "Index unavailable");
        assert_eq!(err.to_string(), "Server error (503): Index unavailable");
    }

    #[test]
    fn test_malformed_response_is_generic() {
        let err = SearchError::MalformedResponse("missing field `results`".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }
}
