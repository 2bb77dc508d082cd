//! Fetch failure taxonomy.
//!
//! Every failure a queue read can hit is reduced to a `FetchError` at the
//! client boundary. Views never see a raw `reqwest::Error`; they only see
//! the variant and its display message.

use thiserror::Error;

const GENERIC_NETWORK: &str = "Unable to reach the server. Check your connection.";
const GENERIC_TIMEOUT: &str = "The server took too long to respond.";
const GENERIC_AUTH: &str = "Your session has expired. Please sign in again.";
const GENERIC_NOT_FOUND: &str = "The requested record was not found.";
const GENERIC_SERVER: &str = "Something went wrong. Please try again.";
const GENERIC_DECODE: &str = "Received an unexpected response from the server.";
const GENERIC_NO_TOKEN: &str = "You are not signed in.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("No bearer token available")]
    MissingToken,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed ({status})")]
    Unauthorized { status: u16, message: Option<String> },

    #[error("Not found")]
    NotFound { message: Option<String> },

    #[error("Server error ({status})")]
    Server { status: u16, message: Option<String> },

    #[error("Response parsing error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Classify a non-success HTTP status, keeping the server's `message` if any.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.filter(|m| !m.trim().is_empty());
        match status {
            401 | 403 => Self::Unauthorized { status, message },
            404 => Self::NotFound { message },
            _ => Self::Server { status, message },
        }
    }

    /// Single user-facing string: server message first, generic fallback otherwise.
    pub fn display_message(&self) -> String {
        match self {
            Self::MissingToken => GENERIC_NO_TOKEN.to_string(),
            Self::Transport(_) => GENERIC_NETWORK.to_string(),
            Self::Timeout => GENERIC_TIMEOUT.to_string(),
            Self::Unauthorized { message, .. } => {
                message.clone().unwrap_or_else(|| GENERIC_AUTH.to_string())
            }
            Self::NotFound { message } => {
                message.clone().unwrap_or_else(|| GENERIC_NOT_FOUND.to_string())
            }
            Self::Server { message, .. } => {
                message.clone().unwrap_or_else(|| GENERIC_SERVER.to_string())
            }
            Self::Decode(_) => GENERIC_DECODE.to_string(),
        }
    }

    /// 401/403 (and a missing token) are handed to the auth collaborator.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::MissingToken)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(FetchError::from_status(401, None), FetchError::Unauthorized { status: 401, .. }));
        assert!(matches!(FetchError::from_status(403, None), FetchError::Unauthorized { status: 403, .. }));
        assert!(matches!(FetchError::from_status(404, None), FetchError::NotFound { .. }));
        assert!(matches!(FetchError::from_status(500, None), FetchError::Server { status: 500, .. }));
        assert!(matches!(FetchError::from_status(422, None), FetchError::Server { status: 422, .. }));
    }

    #[test]
    fn server_message_preferred() {
        let err = FetchError::from_status(500, Some("Queue not initialised".into()));
        assert_eq!(err.display_message(), "Queue not initialised");
    }

    #[test]
    fn blank_server_message_falls_back() {
        let err = FetchError::from_status(404, Some("   ".into()));
        assert_eq!(err.display_message(), GENERIC_NOT_FOUND);
    }

    #[test]
    fn transport_uses_generic_message() {
        let err = FetchError::Transport("connection refused".into());
        assert_eq!(err.display_message(), GENERIC_NETWORK);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn auth_failures() {
        assert!(FetchError::from_status(403, None).is_auth_failure());
        assert!(FetchError::MissingToken.is_auth_failure());
        assert!(!FetchError::from_status(500, None).is_auth_failure());
        assert!(!FetchError::Timeout.is_auth_failure());
    }
}
