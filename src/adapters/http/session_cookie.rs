//! Session cookie helpers.
//!
//! The cookie carries only the session id. It is HttpOnly, `SameSite=Lax`,
//! scoped to `/`, marked `Secure` in production and lives as long as the
//! server-side session.

use std::time::Duration;

use axum::http::{header, HeaderMap};
use cookie::{Cookie, SameSite};

use crate::config::SessionConfig;
use crate::domain::foundation::SessionId;

/// Builds and reads the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    secure: bool,
    max_age: Duration,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, secure: bool, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age,
        }
    }

    pub fn from_config(config: &SessionConfig, secure: bool) -> Self {
        Self::new(config.cookie_name.clone(), secure, config.ttl())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session id from the request's `Cookie` headers.
    ///
    /// A missing cookie, or a value that is not a session id, is `None`.
    pub fn session_id(&self, headers: &HeaderMap) -> Option<SessionId> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == self.name)
            .and_then(|cookie| cookie.value().parse().ok())
    }

    /// Cookie pointing the browser at `id`.
    pub fn issue(&self, id: SessionId) -> Cookie<'static> {
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        Cookie::build((self.name.clone(), id.to_string()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::seconds(max_age))
            .build()
    }

    /// Cookie that makes the browser forget the session.
    pub fn expire(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), ""))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::ZERO)
            .expires(cookie::time::OffsetDateTime::UNIX_EPOCH)
            .build()
    }
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default(), false)
    }
}
