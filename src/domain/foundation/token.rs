//! Bearer token issued by the model API.
//!
//! The token is opaque: it is never parsed or validated locally, only stored
//! in the session and forwarded as `Authorization: Bearer <token>`. It is kept
//! behind `secrecy::Secret` so it cannot leak through `Debug` or logs.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// Opaque bearer credential.
///
/// Construction rejects empty and whitespace-only strings, so holding an
/// `AuthToken` means holding a usable token.
#[derive(Clone)]
pub struct AuthToken(Secret<String>);

impl AuthToken {
    /// Wraps a raw token, returning `None` when it is blank.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(Secret::new(raw)))
    }

    /// Exposes the raw token (for building requests).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Value of the `Authorization` header carrying this token.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl PartialEq for AuthToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AuthToken {}
