//! LogoutHandler - forgets the session's token.

use std::sync::Arc;

use super::AccountError;
use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

/// Command to log out.
#[derive(Debug, Clone)]
pub struct LogoutCommand {
    pub session_id: Option<SessionId>,
}

/// Handler for logging out. Idempotent: a missing or unknown session is a no-op.
pub struct LogoutHandler {
    sessions: Arc<dyn SessionStore>,
}

impl LogoutHandler {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, cmd: LogoutCommand) -> Result<(), AccountError> {
        let Some(id) = cmd.session_id else {
            return Ok(());
        };

        match self.sessions.load(id).await {
            Ok(mut session) => {
                session.clear_token();
                self.sessions.delete(session.id()).await?;
                tracing::info!(session_id = %id, "User logged out");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::foundation::AuthToken;
    use crate::domain::session::Session;

    #[tokio::test]
    async fn logout_deletes_session() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = Session::new(chrono::Duration::hours(1));
        session.set_token(AuthToken::new("T").unwrap(), "u");
        store.save(&session).await.unwrap();
        let handler = LogoutHandler::new(store.clone());

        handler
            .handle(LogoutCommand {
                session_id: Some(session.id()),
            })
            .await
            .unwrap();

        assert!(store.load(session.id()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn logout_twice_is_fine() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = LogoutHandler::new(store);
        let id = SessionId::new();

        for _ in 0..2 {
            handler
                .handle(LogoutCommand {
                    session_id: Some(id),
                })
                .await
                .unwrap();
        }
        handler.handle(LogoutCommand { session_id: None }).await.unwrap();
    }
}
