//! Error types for the runners client

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Runner operation a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListRunners,
    GetRunner,
    CreateRunner,
    DeleteRunner,
    SetRunnerStatus,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::ListRunners => write!(f, "fetch runners"),
            Operation::GetRunner => write!(f, "fetch runner"),
            Operation::CreateRunner => write!(f, "create runner"),
            Operation::DeleteRunner => write!(f, "delete runner"),
            Operation::SetRunnerStatus => write!(f, "update runner status"),
        }
    }
}

/// Failure raised by a transport, before or while a response is read
#[derive(Debug, Error)]
pub enum TransportError {
    /// reqwest failed to send the request or to read the body
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The token endpoint refused to issue an access token
    #[error("token request failed, status: {status}, body: {body}")]
    Token {
        /// HTTP status code of the token endpoint
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Any other failure reported by a custom transport
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create a transport error from a plain message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Errors that can occur when using the runners client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport could not deliver the request
    #[error(transparent)]
    Transport(TransportError),

    /// A response arrived but its body could not be read
    #[error("Failed to read response body: {0}")]
    BodyRead(#[source] TransportError),

    /// The API answered with a status outside the accepted set
    #[error("failed to {operation}, status: {status}, body: {body}")]
    Status {
        /// Operation that failed
        operation: Operation,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The status was accepted but the body did not match the expected shape
    #[error("failed to decode {operation} response: {source}")]
    Decode {
        /// Operation that failed
        operation: Operation,
        /// Parser diagnostic
        #[source]
        source: serde_json::Error,
    },

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create a status error from an operation, status code and body
    pub fn status_error(operation: Operation, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            operation,
            status,
            body: body.into(),
        }
    }

    /// HTTP status code, if the server answered with a rejected status
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_status_error_message() {
        let err = ClientError::status_error(Operation::ListRunners, 400, "{}");
        assert_eq!(
            err.to_string(),
            "failed to fetch runners, status: 400, body: {}"
        );
        assert_eq!(err.status(), Some(400));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_status_predicates() {
        assert!(ClientError::status_error(Operation::GetRunner, 404, "").is_not_found());
        assert!(ClientError::status_error(Operation::GetRunner, 503, "").is_server_error());
        assert!(!ClientError::Transport(TransportError::other("boom")).is_client_error());
    }

    #[test]
    fn test_decode_error_names_operation() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ClientError::Decode {
            operation: Operation::CreateRunner,
            source,
        };

        let message = err.to_string();
        assert!(message.starts_with("failed to decode create runner response: "));
        assert!(message.contains("line 1 column 1"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_transport_error_keeps_cause() {
        let err = ClientError::Transport(TransportError::other("dial tcp: refused"));
        assert_eq!(err.to_string(), "dial tcp: refused");
        assert!(matches!(err, ClientError::Transport(TransportError::Other(_))));
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::DeleteRunner.to_string(), "delete runner");
        assert_eq!(
            Operation::SetRunnerStatus.to_string(),
            "update runner status"
        );
    }
}
