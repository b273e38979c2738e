//! Session gate middleware and extractor for axum.
//!
//! This module provides:
//! - `require_session` - Layer that resolves the session cookie and injects the
//!   session's bearer token into extensions, or redirects to `/login`
//! - `RequireToken` - Extractor that reads what the gate injected
//!
//! # Architecture
//!
//! ```text
//! Request -> require_session -> cookie -> SessionStore::load -> token?
//!                 |                                               |
//!                 +-- any failure: 303 /login        injects SessionAuth
//!                                                                 |
//!                                       Handler -> RequireToken reads extensions
//! ```
//!
//! A handler behind the gate never runs without a non-empty token.
//!
//! # Example
//!
//! ```ignore
//! let protected = Router::new()
//!     .route("/dashboard", get(dashboard))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_session));
//!
//! async fn dashboard(RequireToken(auth): RequireToken) -> impl IntoResponse {
//!     format!("token for {:?}", auth.username)
//! }
//! ```

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::adapters::http::state::AppState;
use crate::domain::foundation::{AuthToken, SessionId};
use crate::domain::session::SessionError;

/// What the gate attaches to an authorized request.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    pub session_id: SessionId,
    pub token: AuthToken,
    pub username: Option<String>,
}

/// Session gate middleware.
///
/// This middleware:
/// 1. Reads the session id from the session cookie
/// 2. Loads the session from the `SessionStore`
/// 3. On a session holding a token, injects `SessionAuth` and runs the handler
/// 4. Otherwise redirects to `/login` without running the handler
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session_id = state.settings.cookie.session_id(request.headers());
    match authorize(&state, session_id).await {
        Ok(auth) => {
            request.extensions_mut().insert(auth);
            next.run(request).await
        }
        Err(rejection) => {
            rejection.log(request.uri().path());
            rejection.into_response()
        }
    }
}

async fn authorize(
    state: &AppState,
    session_id: Option<SessionId>,
) -> Result<SessionAuth, GateRejection> {
    let session_id = session_id.ok_or(GateRejection::NoSession)?;

    let session = state
        .sessions
        .load(session_id)
        .await
        .map_err(|e| match e {
            SessionError::NotFound => GateRejection::NoSession,
            other => GateRejection::Store(other),
        })?;

    let token = session.token().cloned().ok_or(GateRejection::NoToken)?;

    Ok(SessionAuth {
        session_id,
        token,
        username: session.username().map(str::to_string),
    })
}

/// Extractor for the session token injected by [`require_session`].
///
/// Mounted outside the gate it finds nothing and rejects with the same
/// redirect.
#[derive(Debug, Clone)]
pub struct RequireToken(pub SessionAuth);

#[async_trait]
impl<S> FromRequestParts<S> for RequireToken
where
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionAuth>()
            .cloned()
            .map(RequireToken)
            .ok_or(GateRejection::NoToken)
    }
}

/// Why the gate refused a request. Every variant answers with a redirect.
#[derive(Debug, Clone)]
pub enum GateRejection {
    /// No cookie, an unparsable cookie, or an unknown or expired session.
    NoSession,
    /// The session exists but holds no token.
    NoToken,
    /// The session store failed.
    Store(SessionError),
}

impl GateRejection {
    fn log(&self, path: &str) {
        match self {
            GateRejection::Store(e) => {
                tracing::warn!(path, error = %e, "Session lookup failed, redirecting to login")
            }
            _ => tracing::debug!(path, reason = ?self, "Unauthenticated request"),
        }
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}
