//! Session store port.
//!
//! Maps a session id to its [`Session`]. The store is created at startup and
//! handed to every handler through application state; there is no
//! process-global session map.
//!
//! # Contract
//!
//! Implementations must:
//! - Return `SessionError::NotFound` for unknown or expired ids
//! - Return `SessionError::Io` when persistence fails
//! - Treat deleting an unknown id as success

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::session::{Session, SessionError};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a live session.
    async fn load(&self, id: SessionId) -> Result<Session, SessionError>;

    /// Insert or replace a session.
    async fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Remove a session. Missing ids are not an error.
    async fn delete(&self, id: SessionId) -> Result<(), SessionError>;

    /// Drop every expired session, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize, SessionError>;
}
