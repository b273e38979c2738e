use thiserror::Error;

use crate::domain::backend::BackendError;
use crate::domain::session::SessionError;

/// Failures of the account use cases.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AccountError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Session store failure: {0}")]
    Session(#[from] SessionError),
}
