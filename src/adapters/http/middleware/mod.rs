//! HTTP middleware for axum.
//!
//! - `auth` - session gate for protected pages and the `RequireToken` extractor

pub mod auth;

pub use auth::{require_session, GateRejection, RequireToken, SessionAuth};
