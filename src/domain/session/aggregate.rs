//! Browser session record.

use chrono::{DateTime, Duration, Utc};

use crate::domain::foundation::{AuthToken, SessionId};

/// Server-side session keyed by the cookie-carried [`SessionId`].
///
/// The only value a session holds is the bearer token (plus the username it
/// was issued for, for display). The token is a typed optional field:
/// reading it when absent yields `None`.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    token: Option<AuthToken>,
    username: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates an empty session that expires after `ttl`. A `ttl` past the
    /// representable range saturates instead of overflowing.
    pub fn new(ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            token: None,
            username: None,
            created_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The stored bearer token, if the session is logged in.
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Stores the token issued at login.
    pub fn set_token(&mut self, token: AuthToken, username: impl Into<String>) {
        self.token = Some(token);
        self.username = Some(username.into());
    }

    /// Removes the token. Clearing an already empty session is a no-op.
    pub fn clear_token(&mut self) {
        self.token = None;
        self.username = None;
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
