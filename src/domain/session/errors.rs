//! Session-specific error types.

use thiserror::Error;

/// Session store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No valid session exists: no cookie, unknown id or expired.
    #[error("Session not found")]
    NotFound,

    /// The store could not persist or read the session.
    #[error("Session storage failed: {0}")]
    Io(String),
}

impl SessionError {
    pub fn io(message: impl Into<String>) -> Self {
        SessionError::Io(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SessionError::NotFound)
    }
}
