//! Backend client error taxonomy.

use thiserror::Error;

use super::BackendOperation;

/// Errors reported by the backend client.
///
/// All of them are terminal for the request: nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// The model API could not be reached, timed out, or dropped the body.
    #[error("Failed to connect to the model service: {0}")]
    Connection(String),

    /// The model API answered with a status other than the expected one.
    #[error("{operation} rejected by the model service with status {status} (expected {expected})")]
    Rejected {
        operation: BackendOperation,
        status: u16,
        expected: u16,
        /// The backend's `{"error": ...}` text, when it sent one.
        message: Option<String>,
    },

    /// The success body was not the JSON shape the operation expects.
    #[error("Failed to parse the {operation} response: {reason}")]
    Decode {
        operation: BackendOperation,
        reason: String,
    },

    /// A file exceeded the upload bound; nothing was sent.
    #[error("File exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: usize },

    /// The request could not be built (bad base URL, bad input).
    #[error("Invalid backend request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    pub fn connection(message: impl Into<String>) -> Self {
        BackendError::Connection(message.into())
    }

    pub fn decode(operation: BackendOperation, reason: impl Into<String>) -> Self {
        BackendError::Decode {
            operation,
            reason: reason.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        BackendError::InvalidRequest(message.into())
    }

    /// Status code carried by a `Rejected` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend reported success, just not with the code this
    /// deployment expects (e.g. 200 where 201 was configured).
    pub fn is_unexpected_success(&self) -> bool {
        matches!(self, BackendError::Rejected { status, .. } if (200..300).contains(status))
    }

    /// True when the backend refused the caller's token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Rejected { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(status: u16, expected: u16) -> BackendError {
        BackendError::Rejected {
            operation: BackendOperation::Register,
            status,
            expected,
            message: None,
        }
    }

    #[test]
    fn unexpected_success_is_distinguished() {
        assert!(rejected(200, 201).is_unexpected_success());
        assert!(!rejected(400, 201).is_unexpected_success());
        assert!(!BackendError::connection("refused").is_unexpected_success());
    }

    #[test]
    fn status_only_on_rejected() {
        assert_eq!(rejected(404, 200).status(), Some(404));
        assert_eq!(BackendError::connection("refused").status(), None);
        assert_eq!(
            BackendError::decode(BackendOperation::Login, "eof").status(),
            None
        );
    }

    #[test]
    fn unauthorized_detection() {
        assert!(rejected(401, 200).is_unauthorized());
        assert!(!rejected(403, 200).is_unauthorized());
    }

    #[test]
    fn display_names_operation() {
        let message = rejected(500, 201).to_string();
        assert!(message.contains("register"));
        assert!(message.contains("500"));
    }
}
