//! RegisterHandler - creates an account on the model API.

use std::sync::Arc;

use super::AccountError;
use crate::domain::backend::{Acknowledgement, Credentials};
use crate::ports::MlBackend;

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub credentials: Credentials,
    pub email: Option<String>,
}

/// Handler for registration. No session is created; the user logs in next.
pub struct RegisterHandler {
    backend: Arc<dyn MlBackend>,
}

impl RegisterHandler {
    pub fn new(backend: Arc<dyn MlBackend>) -> Self {
        Self { backend }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<Acknowledgement, AccountError> {
        let credentials = cmd.credentials.with_email(cmd.email);
        let ack = self.backend.register(&credentials).await?;
        tracing::info!(username = %credentials.username, "User registered");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::MockMlBackend;
    use crate::domain::backend::{BackendError, BackendOperation};

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let backend = Arc::new(MockMlBackend::new().with_user("taken", "p", "T"));
        let handler = RegisterHandler::new(backend);

        let err = handler
            .handle(RegisterCommand {
                credentials: Credentials::new("taken", "p"),
                email: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AccountError::Backend(BackendError::Rejected { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn registration_reaches_backend_once() {
        let backend = Arc::new(MockMlBackend::new());
        let handler = RegisterHandler::new(backend.clone());

        handler
            .handle(RegisterCommand {
                credentials: Credentials::new("new", "pw"),
                email: None,
            })
            .await
            .unwrap();

        assert_eq!(backend.calls(), vec![BackendOperation::Register]);
    }

    #[tokio::test]
    async fn email_is_forwarded_with_registration() {
        let backend = Arc::new(MockMlBackend::new());
        let handler = RegisterHandler::new(backend.clone());

        handler
            .handle(RegisterCommand {
                credentials: Credentials::new("new", "pw"),
                email: Some("new@example.com".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(backend.email_of("new").as_deref(), Some("new@example.com"));
    }
}
