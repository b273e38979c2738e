//! LoginHandler - exchanges credentials for a token held in a session.

use std::sync::Arc;

use chrono::Duration;

use super::AccountError;
use crate::domain::backend::{BackendError, BackendOperation, Credentials};
use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{MlBackend, SessionStore};

/// Command to log in.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    /// Session from the request cookie, if any. Replaced, never reused.
    pub session_id: Option<SessionId>,
    pub credentials: Credentials,
}

/// Handler for logging in.
pub struct LoginHandler {
    backend: Arc<dyn MlBackend>,
    sessions: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl LoginHandler {
    pub fn new(
        backend: Arc<dyn MlBackend>,
        sessions: Arc<dyn SessionStore>,
        ttl: std::time::Duration,
    ) -> Self {
        Self {
            backend,
            sessions,
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::days(1)),
        }
    }

    /// Returns the saved session now holding the issued token.
    pub async fn handle(&self, cmd: LoginCommand) -> Result<Session, AccountError> {
        // 1. Authenticate against the model API
        let result = self.backend.login(&cmd.credentials).await?;
        let token = result
            .token()
            .ok_or_else(|| BackendError::decode(BackendOperation::Login, "empty access_token"))?;

        // 2. Always a fresh session; a pre-login id is never promoted
        let mut session = Session::new(self.ttl);
        session.set_token(token, cmd.credentials.username.clone());
        self.sessions.save(&session).await?;

        // 3. Drop the session the request arrived with
        if let Some(previous) = cmd.session_id {
            if let Err(e) = self.sessions.delete(previous).await {
                tracing::warn!(session_id = %previous, error = %e, "Failed to delete previous session");
            }
        }

        tracing::info!(
            session_id = %session.id(),
            username = %cmd.credentials.username,
            "User logged in"
        );

        Ok(session)
    }
}
